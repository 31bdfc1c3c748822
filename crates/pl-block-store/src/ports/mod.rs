//! # Block-Store Ports
//!
//! Read contract over the committed chain. A `BlockQuery` is a pinned
//! view: it keeps answering from the chain as it stood when the view was
//! opened, even while new blocks are appended.

use shared_types::{AccountId, AssetId, Block, Hash, Transaction};

use crate::domain::{BlockStoreError, TxLocation};

/// One pinned read-only view of the committed chain.
pub trait BlockQuery: Send + Sync {
    /// Chain tip height of this view.
    fn height(&self) -> u64;

    /// Block at `height`; fails for height 0 or beyond the tip.
    fn block(&self, height: u64) -> Result<Block, BlockStoreError>;

    /// Transaction by hash, with its `(height, index)` location.
    fn transaction(&self, hash: &Hash) -> Option<(Transaction, TxLocation)>;

    /// Committed transactions created by `account`, ascending by
    /// `(height, index)`.
    fn account_transactions(&self, account: &AccountId) -> Vec<(Transaction, TxLocation)>;

    /// Committed transactions moving `asset` into or out of `account`,
    /// ascending by `(height, index)`.
    fn account_asset_transactions(
        &self,
        account: &AccountId,
        asset: &AssetId,
    ) -> Vec<(Transaction, TxLocation)>;
}

/// A store that can open pinned chain views.
pub trait BlockStoreReader: Send + Sync {
    fn open_view(&self) -> Box<dyn BlockQuery>;
}
