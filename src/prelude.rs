//! Everything an application or storage coordinator usually needs in scope.
//!
//! Only the synchronous [`TransactionSupport`] is included; import
//! [`AsyncTransactionSupport`](crate::AsyncTransactionSupport) explicitly when
//! driving an async coordinator, since both share method names.

pub use crate::bean::lifecycle;
pub use crate::bean::{AsBean, Bean, BeanType, Lifecycle};
pub use crate::core::{BeanEnum, BeanError, FromValue, IntoValue, Result, Value};
pub use crate::kind::KindRegistry;
pub use crate::transaction::{TransactionJournal, TransactionSupport};
pub use crate::bean_enum;
