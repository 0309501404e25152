pub mod convert;
pub mod enums;
pub mod error;
pub mod naming;
pub mod value;

pub use convert::{ConvertError, ConvertResult, FromValue, IntoValue};
pub use enums::BeanEnum;
pub use error::{BeanError, Result};
pub use naming::validate_name;
pub use value::{Value, ValueTag};
