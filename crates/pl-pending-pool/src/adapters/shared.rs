//! # Shared Pending Pool
//!
//! The pool behind a read/write lock. The write path inserts submissions
//! and drops committed hashes; the query engine only reads.

use parking_lot::RwLock;
use shared_types::{AccountId, Hash, Transaction};

use crate::domain::{PendingPage, PendingPool, PendingPoolError};
use crate::ports::PendingPoolReader;

/// Thread-safe pending pool.
#[derive(Default)]
pub struct SharedPendingPool {
    inner: RwLock<PendingPool>,
}

impl SharedPendingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a submitted transaction.
    pub fn insert(&self, tx: Transaction) -> Result<(), PendingPoolError> {
        self.inner.write().insert(tx)
    }

    /// Drops transactions that just got committed.
    pub fn remove_committed(&self, hashes: &[Hash]) {
        self.inner.write().remove_committed(hashes);
    }

    /// Number of pending transactions across all accounts.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True iff nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl PendingPoolReader for SharedPendingPool {
    fn pending_for(&self, account: &AccountId) -> Vec<Transaction> {
        self.inner.read().all_for(account)
    }

    fn pending_page(
        &self,
        account: &AccountId,
        page_size: u32,
        first: Option<&Hash>,
    ) -> Result<PendingPage, PendingPoolError> {
        self.inner.read().page_for(account, page_size, first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Amount, AssetId, Command};

    fn pending_tx(nonce: u64) -> Transaction {
        Transaction {
            creator_account_id: "id@domain".parse().unwrap(),
            created_time_ms: nonce,
            commands: vec![Command::AddAssetQuantity {
                asset_id: "coin#domain".parse::<AssetId>().unwrap(),
                amount: Amount(1),
            }],
            signatures: vec![],
        }
    }

    #[test]
    fn test_reads_are_real_time() {
        let pool = SharedPendingPool::new();
        let account = "id@domain".parse().unwrap();
        assert!(pool.pending_for(&account).is_empty());

        pool.insert(pending_tx(1)).unwrap();
        assert_eq!(pool.pending_for(&account).len(), 1);

        pool.remove_committed(&[pending_tx(1).hash()]);
        assert!(pool.pending_for(&account).is_empty());
    }
}
