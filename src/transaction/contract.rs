use crate::core::Result;
use async_trait::async_trait;
use std::future::Future;

/// What a storage coordinator must provide around multi-step operations.
///
/// Whether a transaction opened while another is active is flattened into the
/// outer one or becomes a savepoint is the coordinator's choice; callers must
/// not rely on either.
pub trait TransactionSupport {
    fn in_transaction(&self) -> bool;

    /// Runs `action` in a transaction.
    ///
    /// `Ok(true)` commits. `Ok(false)` rolls back and returns `Ok(())`.
    /// `Err(e)` rolls back and returns that same `e`.
    fn transaction_with<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce() -> Result<bool>;

    /// Runs `action` in a transaction, committing unless it fails.
    fn transaction<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.transaction_with(|| action().map(|()| true))
    }
}

/// [`TransactionSupport`] for coordinators driven by async I/O.
#[async_trait]
pub trait AsyncTransactionSupport: Send + Sync {
    async fn in_transaction(&self) -> bool;

    /// Same commit/rollback rules as [`TransactionSupport::transaction_with`].
    async fn transaction_with<F, Fut>(&self, action: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<bool>> + Send;

    async fn transaction<F, Fut>(&self, action: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<()>> + Send,
    {
        self.transaction_with(|| async move { action().await.map(|()| true) })
            .await
    }
}
