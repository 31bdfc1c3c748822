//! # Pending-Pool Ports
//!
//! Read contract over the pending pool. Unlike world-state and chain
//! views, pending reads are real-time: each call observes the pool as it
//! is at that instant, and the pool guarantees internal consistency per
//! call only.

use shared_types::{AccountId, Hash, Transaction};

use crate::domain::{PendingPage, PendingPoolError};

/// Real-time read access to pending transactions.
pub trait PendingPoolReader: Send + Sync {
    /// All transactions pending for `account`, arrival order.
    fn pending_for(&self, account: &AccountId) -> Vec<Transaction>;

    /// One page of `account`'s pending transactions; fails with
    /// `NotFound` when `first` is not currently pending for the account.
    fn pending_page(
        &self,
        account: &AccountId,
        page_size: u32,
        first: Option<&Hash>,
    ) -> Result<PendingPage, PendingPoolError>;
}
