// ============================================================================
// RustBean Library
// ============================================================================

pub mod bean;
pub mod core;
pub mod kind;
pub mod prelude;
pub mod transaction;

// Re-export main types for convenience
pub use crate::bean::{AsBean, Bean, BeanType, ID_PROP_NAME, Lifecycle, PropertyBag, lifecycle};
pub use crate::core::{
    BeanEnum, BeanError, ConvertError, FromValue, IntoValue, Result, Value, ValueTag,
    validate_name,
};
pub use crate::kind::KindRegistry;
pub use crate::transaction::{
    AsyncTransactionSupport, TransactionJournal, TransactionState, TransactionSupport,
};
