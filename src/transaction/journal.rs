use super::{
    AsyncTransactionSupport, TransactionId, TransactionRecord, TransactionState,
    TransactionSupport,
};
use crate::core::{BeanError, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

tokio::task_local! {
    /// Identity of the async caller whose transaction the current task runs in.
    static ASYNC_CALLER: u64;
}

static NEXT_ASYNC_CALLER: AtomicU64 = AtomicU64::new(1);

/// In-memory transaction coordinator with no backing store.
///
/// Records every transaction it runs so callers (and tests) can observe
/// commit/rollback decisions. In flat mode (the default) a transaction opened
/// inside another joins it, and a rollback request from the inner one makes the
/// outer one roll back. In nested mode every level is its own savepoint.
///
/// A journal may be shared between threads and tasks. Each caller (a thread for
/// [`TransactionSupport`], an outermost async transaction and everything awaited
/// inside it for [`AsyncTransactionSupport`]) gets its own stack of open
/// levels, so concurrent callers never join or close each other's transactions.
#[derive(Debug, Default)]
pub struct TransactionJournal {
    nested: bool,
    inner: Mutex<JournalInner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Caller {
    Thread(ThreadId),
    Task(u64),
}

impl Caller {
    fn current_thread() -> Self {
        Caller::Thread(thread::current().id())
    }
}

#[derive(Debug, Default)]
struct JournalInner {
    open: HashMap<Caller, Vec<OpenTransaction>>,
    history: Vec<TransactionRecord>,
}

#[derive(Debug)]
struct OpenTransaction {
    id: TransactionId,
    rollback_only: bool,
}

enum ScopeKind {
    Owned(TransactionId),
    Joined,
}

/// An open level; rolls back on drop if never finished.
struct Scope<'a> {
    journal: &'a TransactionJournal,
    caller: Caller,
    kind: ScopeKind,
    done: bool,
}

impl Scope<'_> {
    fn finish(mut self, commit: bool) -> Result<()> {
        self.done = true;
        self.journal.finish(self.caller, &self.kind, commit)
    }

    /// Closes the level according to what the action returned.
    fn settle(self, outcome: Result<bool>) -> Result<()> {
        match outcome {
            Ok(commit) => self.finish(commit),
            Err(err) => {
                if let Err(finish_err) = self.finish(false) {
                    warn!("Rollback after failed action also failed: {}", finish_err);
                }
                Err(err)
            }
        }
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        if !self.done {
            if let Err(err) = self.journal.finish(self.caller, &self.kind, false) {
                warn!("Rollback of abandoned transaction failed: {}", err);
            }
        }
    }
}

impl TransactionJournal {
    /// Creates a flat-mode journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a journal where every nested transaction is a savepoint.
    pub fn nested() -> Self {
        Self {
            nested: true,
            ..Self::default()
        }
    }

    /// Number of currently open levels, summed over all callers.
    pub fn depth(&self) -> usize {
        self.lock().open.values().map(Vec::len).sum()
    }

    /// Every transaction started so far, oldest first.
    pub fn history(&self) -> Vec<TransactionRecord> {
        self.lock().history.clone()
    }

    pub fn last(&self) -> Option<TransactionRecord> {
        self.lock().history.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, JournalInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_open_for(&self, caller: Caller) -> bool {
        self.lock().open.contains_key(&caller)
    }

    fn begin(&self, caller: Caller) -> Result<Scope<'_>> {
        let mut inner = self.inner.lock()?;
        let depth = inner.open.get(&caller).map_or(0, Vec::len);
        if !self.nested && depth > 0 {
            return Ok(Scope {
                journal: self,
                caller,
                kind: ScopeKind::Joined,
                done: false,
            });
        }

        let id = TransactionId(inner.history.len() as u64 + 1);
        inner.history.push(TransactionRecord {
            id,
            depth,
            state: TransactionState::Active,
        });
        inner.open.entry(caller).or_default().push(OpenTransaction {
            id,
            rollback_only: false,
        });
        debug!("Began {} at depth {}", id, depth);

        Ok(Scope {
            journal: self,
            caller,
            kind: ScopeKind::Owned(id),
            done: false,
        })
    }

    fn finish(&self, caller: Caller, kind: &ScopeKind, commit: bool) -> Result<()> {
        let mut inner = self.inner.lock()?;
        let JournalInner { open, history } = &mut *inner;
        let Some(stack) = open.get_mut(&caller) else {
            return Err(BeanError::TransactionState(
                "no open transaction for this caller".into(),
            ));
        };

        let id = match kind {
            ScopeKind::Joined => {
                if !commit {
                    if let Some(outer) = stack.last_mut() {
                        outer.rollback_only = true;
                    }
                }
                return Ok(());
            }
            ScopeKind::Owned(id) => *id,
        };

        let finished = match stack.last() {
            Some(top) if top.id == id => stack.pop(),
            _ => None,
        };
        let Some(finished) = finished else {
            return Err(BeanError::TransactionState(format!(
                "{} is not the innermost open transaction",
                id
            )));
        };
        if stack.is_empty() {
            open.remove(&caller);
        }

        let committed = commit && !finished.rollback_only;
        let state = if committed {
            TransactionState::Committed
        } else {
            TransactionState::RolledBack
        };
        history[id.index()].state = state;
        debug!("{} {}", id, state);

        if commit && !committed {
            return Err(BeanError::RolledBack(format!(
                "{} was marked rollback-only by a joined transaction",
                id
            )));
        }
        Ok(())
    }

    async fn run_async<F, Fut>(&self, caller: Caller, action: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<bool>> + Send,
    {
        let scope = self.begin(caller)?;
        let outcome = action().await;
        scope.settle(outcome)
    }
}

impl TransactionSupport for TransactionJournal {
    fn in_transaction(&self) -> bool {
        self.is_open_for(Caller::current_thread())
    }

    fn transaction_with<F>(&self, action: F) -> Result<()>
    where
        F: FnOnce() -> Result<bool>,
    {
        let scope = self.begin(Caller::current_thread())?;
        scope.settle(action())
    }
}

#[async_trait]
impl AsyncTransactionSupport for TransactionJournal {
    async fn in_transaction(&self) -> bool {
        match ASYNC_CALLER.try_with(|caller| *caller) {
            Ok(caller) => self.is_open_for(Caller::Task(caller)),
            Err(_) => false,
        }
    }

    async fn transaction_with<F, Fut>(&self, action: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<bool>> + Send,
    {
        match ASYNC_CALLER.try_with(|caller| *caller) {
            Ok(caller) => self.run_async(Caller::Task(caller), action).await,
            Err(_) => {
                let caller = NEXT_ASYNC_CALLER.fetch_add(1, Ordering::Relaxed);
                ASYNC_CALLER
                    .scope(caller, self.run_async(Caller::Task(caller), action))
                    .await
            }
        }
    }
}
