use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeanError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid name format: {0}. Names must be in snake_case.")]
    InvalidName(String),

    #[error("Bean type '{0}' does not declare a kind")]
    KindUnset(&'static str),

    #[error("Hook '{hook}' failed: {message}")]
    HookFailed { hook: &'static str, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transaction rolled back: {0}")]
    RolledBack(String),

    #[error("Invalid transaction state: {0}")]
    TransactionState(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BeanError {
    /// Returns `true` for the two name-grammar failures.
    pub fn is_name_error(&self) -> bool {
        matches!(self, Self::EmptyName | Self::InvalidName(_))
    }

    /// Builds a veto error for use inside a lifecycle hook.
    pub fn hook(hook: &'static str, message: impl Into<String>) -> Self {
        Self::HookFailed {
            hook,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BeanError>;

impl<T> From<std::sync::PoisonError<T>> for BeanError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
