//! Pending-pool error types.

use shared_types::Hash;
use thiserror::Error;

/// Errors surfaced by the pending pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PendingPoolError {
    /// Pagination start hash is not currently pending for the account.
    #[error("no pending transaction {}", hex::encode(hash))]
    NotFound { hash: Hash },

    /// Transaction hash is already pending.
    #[error("duplicate pending transaction {}", hex::encode(hash))]
    Duplicate { hash: Hash },
}
