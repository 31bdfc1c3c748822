//! # Response Values
//!
//! Tagged success and error responses, one variant per query form.
//! Every response echoes the hash of the query that produced it.

use serde::{Deserialize, Serialize};
use shared_types::{
    Account, AccountAsset, Asset, AssetId, Block, Hash, Peer, PublicKey, RoleId,
    RolePermissionSet, Transaction,
};

use pl_world_state::DetailRecordId;

/// Account row plus the roles it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account: Account,
    pub roles: Vec<RoleId>,
}

/// Signatory keys of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatoriesResponse {
    pub keys: Vec<PublicKey>,
}

/// One page of an account's balances.
///
/// Each row carries its balance both in minor units and in the canonical
/// string form with exactly the owning asset's `precision` fractional
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssetsResponse {
    pub assets: Vec<AccountAsset>,
    pub total: u64,
    pub next_asset_id: Option<AssetId>,
}

/// One page of an account's detail records, as a JSON subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetailResponse {
    pub detail: serde_json::Value,
    pub total: u64,
    pub next_record: Option<DetailRecordId>,
}

/// Asset row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResponse {
    pub asset: Asset,
}

/// All role ids, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleId>,
}

/// Permission set of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionsResponse {
    pub permissions: RolePermissionSet,
}

/// All known peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeersResponse {
    pub peers: Vec<Peer>,
}

/// One committed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResponse {
    pub block: Block,
}

/// Transactions fetched by hash, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// One page of a committed transaction stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsPageResponse {
    /// At most `page_size` transactions, ascending `(height, index)`.
    pub transactions: Vec<Transaction>,
    /// Hash of the first matching transaction after this page, absent
    /// when exhausted.
    pub next_tx_hash: Option<Hash>,
    /// Count of all matching transactions.
    pub total: u64,
}

/// One page of the caller's pending transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransactionsPageResponse {
    pub transactions: Vec<Transaction>,
    pub next_tx_hash: Option<Hash>,
    pub total: u64,
}

/// Wire taxonomy of error responses.
///
/// `StatefulFailed` carries one of the stable non-zero codes; the
/// entity-absence kinds carry code 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryErrorKind {
    StatefulFailed,
    NoAccount,
    NoSignatories,
    NoAccountAssets,
    NoAccountDetail,
    NoRoles,
    NoAsset,
    NotSupported,
}

/// The error response value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: QueryErrorKind,
    pub code: u32,
    pub message: String,
}

/// Tagged response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponsePayload {
    Account(AccountResponse),
    Signatories(SignatoriesResponse),
    AccountAssets(AccountAssetsResponse),
    AccountDetail(AccountDetailResponse),
    Asset(AssetResponse),
    Roles(RolesResponse),
    RolePermissions(RolePermissionsResponse),
    Peers(PeersResponse),
    Block(BlockResponse),
    Transactions(TransactionsResponse),
    TransactionsPage(TransactionsPageResponse),
    PendingTransactionsPage(PendingTransactionsPageResponse),
    Error(ErrorResponse),
}

/// A complete query response: body plus the originating query hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query_hash: Hash,
    pub payload: ResponsePayload,
}

impl QueryResponse {
    /// The error body, when this response is an error.
    pub fn error(&self) -> Option<&ErrorResponse> {
        match &self.payload {
            ResponsePayload::Error(err) => Some(err),
            _ => None,
        }
    }

    /// True iff this response is an error.
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}
