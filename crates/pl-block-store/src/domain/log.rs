//! # Chain Log
//!
//! The append-only list of committed blocks plus the indices the read
//! path needs: transaction hash to location, and ascending
//! `(height, index)` location lists per creator and per `(account, asset)`
//! pair.
//!
//! ## Invariants
//!
//! - Heights are dense: `blocks[i].header.height == i + 1`.
//! - `prev_hash` links are intact; height 1 links to the zero hash.
//! - Transaction hashes are unique across the whole chain.
//! - Index entries are stored in ascending `(height, index)` order, where
//!   both components compare as integers.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, AssetId, Block, Command, Hash, Transaction, ZERO_HASH};

use super::errors::BlockStoreError;

/// Where a committed transaction lives: block height and index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxLocation {
    pub height: u64,
    pub index: u64,
}

/// The committed chain and its transaction indices.
#[derive(Debug, Clone, Default)]
pub struct ChainLog {
    blocks: Vec<Block>,
    tx_locations: HashMap<Hash, TxLocation>,
    by_creator: HashMap<AccountId, Vec<TxLocation>>,
    by_account_asset: HashMap<(AccountId, AssetId), Vec<TxLocation>>,
}

impl ChainLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current chain tip height; 0 for an empty chain.
    pub fn height(&self) -> u64 {
        self.blocks.len() as u64
    }

    /// Appends the next block, verifying chain invariants and indexing its
    /// transactions.
    pub fn append(&mut self, block: Block) -> Result<(), BlockStoreError> {
        let expected = self.height() + 1;
        if block.header.height != expected {
            return Err(BlockStoreError::NonContiguousHeight {
                expected,
                actual: block.header.height,
            });
        }

        let expected_prev = match self.blocks.last() {
            Some(tip) => tip.hash(),
            None => ZERO_HASH,
        };
        if block.header.prev_hash != expected_prev {
            return Err(BlockStoreError::BrokenChain {
                height: block.header.height,
            });
        }

        // Hashes must be fresh against the chain and within the block.
        let mut incoming = BTreeSet::new();
        for tx in &block.transactions {
            let hash = tx.hash();
            if self.tx_locations.contains_key(&hash) || !incoming.insert(hash) {
                return Err(BlockStoreError::DuplicateTransaction { hash });
            }
        }

        for (index, tx) in block.transactions.iter().enumerate() {
            let location = TxLocation {
                height: block.header.height,
                index: index as u64,
            };
            self.tx_locations.insert(tx.hash(), location);
            self.by_creator
                .entry(tx.creator_account_id.clone())
                .or_default()
                .push(location);
            for key in Self::touched_account_assets(tx) {
                self.by_account_asset.entry(key).or_default().push(location);
            }
        }

        tracing::debug!(
            "[pl-blocks] appended block #{} with {} txs",
            block.header.height,
            block.transactions.len()
        );
        self.blocks.push(block);
        Ok(())
    }

    /// Block at `height`.
    pub fn block(&self, height: u64) -> Result<&Block, BlockStoreError> {
        if height == 0 || height > self.height() {
            return Err(BlockStoreError::InvalidHeight {
                height,
                current: self.height(),
            });
        }
        Ok(&self.blocks[(height - 1) as usize])
    }

    /// Transaction by hash, with its location.
    pub fn transaction(&self, hash: &Hash) -> Option<(&Transaction, TxLocation)> {
        let location = *self.tx_locations.get(hash)?;
        Some((self.tx_at(location), location))
    }

    /// All committed transactions created by `account`, ascending by
    /// `(height, index)`.
    pub fn account_transactions(&self, account: &AccountId) -> Vec<(Transaction, TxLocation)> {
        self.collect(self.by_creator.get(account))
    }

    /// All committed transactions moving `asset` into or out of `account`,
    /// ascending by `(height, index)`.
    pub fn account_asset_transactions(
        &self,
        account: &AccountId,
        asset: &AssetId,
    ) -> Vec<(Transaction, TxLocation)> {
        self.collect(
            self.by_account_asset
                .get(&(account.clone(), asset.clone())),
        )
    }

    fn collect(&self, locations: Option<&Vec<TxLocation>>) -> Vec<(Transaction, TxLocation)> {
        locations
            .map(|locations| {
                locations
                    .iter()
                    .map(|location| (self.tx_at(*location).clone(), *location))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tx_at(&self, location: TxLocation) -> &Transaction {
        &self.blocks[(location.height - 1) as usize].transactions[location.index as usize]
    }

    /// The `(account, asset)` pairs a transaction's commands touch:
    /// transfers count for both ends, mint/burn for the creator.
    fn touched_account_assets(tx: &Transaction) -> BTreeSet<(AccountId, AssetId)> {
        let mut touched = BTreeSet::new();
        for command in &tx.commands {
            match command {
                Command::TransferAsset {
                    src_account_id,
                    dest_account_id,
                    asset_id,
                    ..
                } => {
                    touched.insert((src_account_id.clone(), asset_id.clone()));
                    touched.insert((dest_account_id.clone(), asset_id.clone()));
                }
                Command::AddAssetQuantity { asset_id, .. }
                | Command::SubtractAssetQuantity { asset_id, .. } => {
                    touched.insert((tx.creator_account_id.clone(), asset_id.clone()));
                }
                Command::SetAccountDetail { .. } => {}
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Amount, BlockHeader};

    fn account_id(s: &str) -> AccountId {
        s.parse().unwrap()
    }

    fn asset_id(s: &str) -> AssetId {
        s.parse().unwrap()
    }

    fn transfer(creator: &str, dest: &str, nonce: u64) -> Transaction {
        Transaction {
            creator_account_id: account_id(creator),
            created_time_ms: nonce,
            commands: vec![Command::TransferAsset {
                src_account_id: account_id(creator),
                dest_account_id: account_id(dest),
                asset_id: asset_id("coin#domain"),
                amount: Amount(10),
                description: String::new(),
            }],
            signatures: vec![],
        }
    }

    fn detail_tx(creator: &str, nonce: u64) -> Transaction {
        Transaction {
            creator_account_id: account_id(creator),
            created_time_ms: nonce,
            commands: vec![Command::SetAccountDetail {
                account_id: account_id(creator),
                key: "k".into(),
                value: "v".into(),
            }],
            signatures: vec![],
        }
    }

    fn chain_with(blocks: Vec<Vec<Transaction>>) -> ChainLog {
        let mut log = ChainLog::new();
        for txs in blocks {
            append_next(&mut log, txs);
        }
        log
    }

    fn append_next(log: &mut ChainLog, txs: Vec<Transaction>) {
        let height = log.height() + 1;
        let prev_hash = if height == 1 {
            ZERO_HASH
        } else {
            log.block(height - 1).unwrap().hash()
        };
        log.append(Block {
            header: BlockHeader {
                height,
                prev_hash,
                created_time: height,
            },
            transactions: txs,
        })
        .unwrap();
    }

    // ========== Test Group 1: Append Invariants ==========

    #[test]
    fn test_append_requires_dense_heights() {
        let mut log = ChainLog::new();
        let err = log
            .append(Block {
                header: BlockHeader {
                    height: 2,
                    prev_hash: ZERO_HASH,
                    created_time: 1,
                },
                transactions: vec![],
            })
            .unwrap_err();
        assert_eq!(
            err,
            BlockStoreError::NonContiguousHeight {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_append_requires_intact_chain() {
        let mut log = chain_with(vec![vec![]]);
        let err = log
            .append(Block {
                header: BlockHeader {
                    height: 2,
                    prev_hash: [7u8; 32],
                    created_time: 2,
                },
                transactions: vec![],
            })
            .unwrap_err();
        assert_eq!(err, BlockStoreError::BrokenChain { height: 2 });
    }

    #[test]
    fn test_append_rejects_duplicate_tx() {
        let tx = transfer("id@domain", "id2@domain", 1);
        let mut log = chain_with(vec![vec![tx.clone()]]);
        let prev_hash = log.block(1).unwrap().hash();
        let err = log
            .append(Block {
                header: BlockHeader {
                    height: 2,
                    prev_hash,
                    created_time: 2,
                },
                transactions: vec![tx],
            })
            .unwrap_err();
        assert!(matches!(err, BlockStoreError::DuplicateTransaction { .. }));
    }

    // ========== Test Group 2: Reads ==========

    #[test]
    fn test_block_bounds() {
        let log = chain_with(vec![vec![], vec![], vec![]]);
        assert_eq!(log.height(), 3);
        assert_eq!(log.block(2).unwrap().header.height, 2);
        assert!(matches!(
            log.block(0),
            Err(BlockStoreError::InvalidHeight { height: 0, current: 3 })
        ));
        assert!(matches!(
            log.block(4),
            Err(BlockStoreError::InvalidHeight { height: 4, current: 3 })
        ));
    }

    #[test]
    fn test_transaction_lookup() {
        let tx = transfer("id@domain", "id2@domain", 1);
        let hash = tx.hash();
        let log = chain_with(vec![vec![], vec![detail_tx("id2@domain", 9), tx]]);

        let (found, location) = log.transaction(&hash).unwrap();
        assert_eq!(found.hash(), hash);
        assert_eq!(location, TxLocation { height: 2, index: 1 });
        assert!(log.transaction(&[0u8; 32]).is_none());
    }

    #[test]
    fn test_account_transactions_ascending_over_many_blocks() {
        // More than 10 blocks so a lexicographic height sort would put
        // "10" before "2" and scramble the order.
        let mut log = ChainLog::new();
        for nonce in 0..12 {
            append_next(&mut log, vec![transfer("id@domain", "id2@domain", nonce)]);
        }

        let txs = log.account_transactions(&account_id("id@domain"));
        assert_eq!(txs.len(), 12);
        let heights: Vec<u64> = txs.iter().map(|(_, l)| l.height).collect();
        assert_eq!(heights, (1..=12).collect::<Vec<u64>>());
    }

    #[test]
    fn test_account_transactions_filters_creator() {
        let log = chain_with(vec![
            vec![transfer("id@domain", "id2@domain", 1)],
            vec![detail_tx("id2@domain", 2)],
        ]);
        assert_eq!(log.account_transactions(&account_id("id@domain")).len(), 1);
        assert_eq!(log.account_transactions(&account_id("id2@domain")).len(), 1);
        assert!(log.account_transactions(&account_id("ghost@domain")).is_empty());
    }

    // ========== Test Group 3: Account-Asset Index ==========

    #[test]
    fn test_asset_index_covers_both_transfer_ends() {
        let log = chain_with(vec![vec![transfer("id@domain", "id2@domain", 1)]]);
        let coin = asset_id("coin#domain");
        assert_eq!(
            log.account_asset_transactions(&account_id("id@domain"), &coin).len(),
            1
        );
        assert_eq!(
            log.account_asset_transactions(&account_id("id2@domain"), &coin).len(),
            1
        );
        assert!(log
            .account_asset_transactions(&account_id("id@domain"), &asset_id("doge#domain"))
            .is_empty());
    }

    #[test]
    fn test_asset_index_attributes_mint_to_creator() {
        let mint = Transaction {
            creator_account_id: account_id("id@domain"),
            created_time_ms: 5,
            commands: vec![Command::AddAssetQuantity {
                asset_id: asset_id("coin#domain"),
                amount: Amount(7),
            }],
            signatures: vec![],
        };
        let log = chain_with(vec![vec![mint]]);
        let coin = asset_id("coin#domain");
        assert_eq!(
            log.account_asset_transactions(&account_id("id@domain"), &coin).len(),
            1
        );
    }

    #[test]
    fn test_asset_index_deduplicates_within_one_tx() {
        // Self-transfer touches (account, asset) twice but must index once.
        let tx = transfer("id@domain", "id@domain", 1);
        let log = chain_with(vec![vec![tx]]);
        let coin = asset_id("coin#domain");
        assert_eq!(
            log.account_asset_transactions(&account_id("id@domain"), &coin).len(),
            1
        );
    }
}
