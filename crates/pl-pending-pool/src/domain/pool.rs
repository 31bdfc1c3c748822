//! # Pending Pool
//!
//! Per-account queues of submitted, not-yet-committed transactions in
//! arrival order.
//!
//! ## Data Structures
//!
//! - `by_account`: arrival-ordered queue per creator
//! - `known_hashes`: O(1) duplicate detection across all accounts
//!
//! ## Invariants
//!
//! - No duplicate hashes (checked in `insert`).
//! - `remove_committed` keeps the pool disjoint from the committed chain.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Hash, Transaction};

use super::errors::PendingPoolError;

/// One page of an account's pending transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPage {
    /// Transactions in arrival order, at most `page_size` entries.
    pub transactions: Vec<Transaction>,
    /// Hash of the first transaction after this page, absent when
    /// exhausted.
    pub next_tx_hash: Option<Hash>,
    /// Count of all transactions pending for the account.
    pub total: u64,
}

/// Arrival-ordered pending transactions, keyed by creator.
#[derive(Debug, Clone, Default)]
pub struct PendingPool {
    by_account: HashMap<AccountId, VecDeque<Transaction>>,
    known_hashes: HashSet<Hash>,
}

impl PendingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending transactions across all accounts.
    pub fn len(&self) -> usize {
        self.known_hashes.len()
    }

    /// True iff nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.known_hashes.is_empty()
    }

    /// Enqueues a submitted transaction under its creator.
    pub fn insert(&mut self, tx: Transaction) -> Result<(), PendingPoolError> {
        let hash = tx.hash();
        if !self.known_hashes.insert(hash) {
            return Err(PendingPoolError::Duplicate { hash });
        }
        self.by_account
            .entry(tx.creator_account_id.clone())
            .or_default()
            .push_back(tx);
        Ok(())
    }

    /// Drops transactions that just got committed.
    pub fn remove_committed(&mut self, hashes: &[Hash]) {
        let committed: HashSet<&Hash> = hashes.iter().collect();
        for queue in self.by_account.values_mut() {
            queue.retain(|tx| !committed.contains(&tx.hash()));
        }
        self.by_account.retain(|_, queue| !queue.is_empty());
        for hash in hashes {
            self.known_hashes.remove(hash);
        }
    }

    /// All transactions pending for `account`, arrival order.
    pub fn all_for(&self, account: &AccountId) -> Vec<Transaction> {
        self.by_account
            .get(account)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// One page of `account`'s pending transactions, starting at
    /// `first` when given.
    ///
    /// Fails with `NotFound` when `first` does not name a transaction
    /// currently pending for the account.
    pub fn page_for(
        &self,
        account: &AccountId,
        page_size: u32,
        first: Option<&Hash>,
    ) -> Result<PendingPage, PendingPoolError> {
        static EMPTY: VecDeque<Transaction> = VecDeque::new();
        let queue = self.by_account.get(account).unwrap_or(&EMPTY);

        let start = match first {
            None => 0,
            Some(hash) => queue
                .iter()
                .position(|tx| &tx.hash() == hash)
                .ok_or(PendingPoolError::NotFound { hash: *hash })?,
        };

        let end = queue.len().min(start + page_size as usize);
        Ok(PendingPage {
            transactions: queue.iter().skip(start).take(end - start).cloned().collect(),
            next_tx_hash: queue.get(end).map(Transaction::hash),
            total: queue.len() as u64,
        })
    }
}
