//! # In-Memory Block Store
//!
//! Copy-on-write store over the `ChainLog`: the log lives behind an `Arc`
//! replaced atomically on append, so open views stay pinned to the chain
//! as it stood when they were taken.

use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{AccountId, AssetId, Block, Hash, Transaction};

use crate::domain::{BlockStoreError, ChainLog, TxLocation};
use crate::ports::{BlockQuery, BlockStoreReader};

/// Shared in-memory block store.
#[derive(Default)]
pub struct InMemoryBlockStore {
    log: RwLock<Arc<ChainLog>>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits the next block, enforcing the chain invariants.
    pub fn append_block(&self, block: Block) -> Result<(), BlockStoreError> {
        let mut guard = self.log.write();
        let mut next = (**guard).clone();
        next.append(block)?;
        *guard = Arc::new(next);
        Ok(())
    }

    /// Current chain tip height.
    pub fn height(&self) -> u64 {
        self.log.read().height()
    }
}

impl BlockStoreReader for InMemoryBlockStore {
    fn open_view(&self) -> Box<dyn BlockQuery> {
        Box::new(ChainView {
            log: Arc::clone(&self.log.read()),
        })
    }
}

/// A pinned view of the chain log.
pub struct ChainView {
    log: Arc<ChainLog>,
}

impl BlockQuery for ChainView {
    fn height(&self) -> u64 {
        self.log.height()
    }

    fn block(&self, height: u64) -> Result<Block, BlockStoreError> {
        self.log.block(height).cloned()
    }

    fn transaction(&self, hash: &Hash) -> Option<(Transaction, TxLocation)> {
        self.log
            .transaction(hash)
            .map(|(tx, location)| (tx.clone(), location))
    }

    fn account_transactions(&self, account: &AccountId) -> Vec<(Transaction, TxLocation)> {
        self.log.account_transactions(account)
    }

    fn account_asset_transactions(
        &self,
        account: &AccountId,
        asset: &AssetId,
    ) -> Vec<(Transaction, TxLocation)> {
        self.log.account_asset_transactions(account, asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{BlockHeader, ZERO_HASH};

    fn empty_block(store: &InMemoryBlockStore) -> Block {
        let height = store.height() + 1;
        let prev_hash = if height == 1 {
            ZERO_HASH
        } else {
            store.open_view().block(height - 1).unwrap().hash()
        };
        Block {
            header: BlockHeader {
                height,
                prev_hash,
                created_time: height,
            },
            transactions: vec![],
        }
    }

    #[test]
    fn test_append_and_read_back() {
        let store = InMemoryBlockStore::new();
        store.append_block(empty_block(&store)).unwrap();
        store.append_block(empty_block(&store)).unwrap();

        let view = store.open_view();
        assert_eq!(view.height(), 2);
        assert_eq!(view.block(1).unwrap().header.height, 1);
    }

    #[test]
    fn test_view_pinned_across_append() {
        let store = InMemoryBlockStore::new();
        store.append_block(empty_block(&store)).unwrap();

        let view = store.open_view();
        store.append_block(empty_block(&store)).unwrap();

        assert_eq!(view.height(), 1);
        assert!(view.block(2).is_err());
        assert_eq!(store.open_view().height(), 2);
    }

    #[test]
    fn test_append_propagates_invariant_errors() {
        let store = InMemoryBlockStore::new();
        let bad = Block {
            header: BlockHeader {
                height: 5,
                prev_hash: ZERO_HASH,
                created_time: 1,
            },
            transactions: vec![],
        };
        assert!(store.append_block(bad).is_err());
        assert_eq!(store.height(), 0);
    }
}
