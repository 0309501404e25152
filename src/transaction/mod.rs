// ============================================================================
// Transaction Contract
// ============================================================================
//
// Bean-facing code depends only on TransactionSupport (or its async twin).
// Storage coordinators implement it; TransactionJournal is an in-memory
// implementation with no backing store.
//
// State transitions:
//   Active ──commit──> Committed
//     │
//     └──rollback──> RolledBack
//
// ============================================================================

pub mod contract;
pub mod journal;
pub mod state;

pub use contract::{AsyncTransactionSupport, TransactionSupport};
pub use journal::TransactionJournal;
pub use state::{TransactionId, TransactionRecord, TransactionState};
