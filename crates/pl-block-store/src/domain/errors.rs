//! Block-store error types.

use shared_types::Hash;
use thiserror::Error;

/// Errors surfaced by chain-log reads and appends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockStoreError {
    /// Height 0 or beyond the chain tip.
    #[error("invalid height {height}: chain tip is {current}")]
    InvalidHeight { height: u64, current: u64 },

    /// Appended block does not extend the tip by exactly one.
    #[error("non-contiguous height: expected {expected}, got {actual}")]
    NonContiguousHeight { expected: u64, actual: u64 },

    /// Appended block's `prev_hash` does not match the tip.
    #[error("broken hash chain at height {height}")]
    BrokenChain { height: u64 },

    /// A transaction hash already exists in the committed chain.
    #[error("duplicate transaction {}", hex::encode(hash))]
    DuplicateTransaction { hash: Hash },
}
