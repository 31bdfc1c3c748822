//! Value objects for paged world-state reads.

use serde::{Deserialize, Serialize};
use shared_types::{AccountAsset, AccountId, AssetId};

/// Identifies one account-detail record: the writer that set it and its key.
///
/// Records are ordered by `(writer, key)`; this is the pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DetailRecordId {
    pub writer: AccountId,
    pub key: String,
}

/// Pagination request for account-detail reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPaging {
    /// Maximum records per page, at least 1.
    pub page_size: u32,
    /// Record to start from; the first record when absent.
    pub first: Option<DetailRecordId>,
}

/// One page of an account's asset balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssetsPage {
    /// Balances in ascending asset-id order, at most `page_size` entries.
    pub assets: Vec<AccountAsset>,
    /// Count of all balances held by the account.
    pub total: u64,
    /// First asset after this page, absent when exhausted.
    pub next_asset_id: Option<AssetId>,
}

/// One page of an account's detail records, re-nested as a JSON subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetailPage {
    /// `{ writer: { key: value } }` for the records in this page.
    pub detail: serde_json::Value,
    /// Count of all records matching the writer/key filter.
    pub total: u64,
    /// First record after this page, absent when exhausted.
    pub next_record: Option<DetailRecordId>,
}
