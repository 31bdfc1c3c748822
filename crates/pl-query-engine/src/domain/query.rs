//! # Query Values
//!
//! The abstract query forms the engine executes. The wire schema layer
//! produces these; by the time they reach the engine all identifiers are
//! well-formed (they may still reference nothing).
//!
//! Every query carries its creator and creation time; identity is the
//! SHA-256 digest over creator, time, and payload, echoed back on every
//! response.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{AccountId, AssetId, Hash, KeyedSignature, RoleId};

use pl_world_state::DetailRecordId;

/// Pagination request over a hash-ordered transaction stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPaginationMeta {
    /// Maximum transactions per page, at least 1.
    pub page_size: u32,
    /// Hash to start from; the oldest matching transaction when absent.
    pub first_tx_hash: Option<Hash>,
}

/// Pagination request over an account's asset balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPaginationMeta {
    /// Maximum balances per page, at least 1.
    pub page_size: u32,
    /// Asset to start from; the first held asset when absent.
    pub first_asset_id: Option<AssetId>,
}

/// Pagination request over an account's detail records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPaginationMeta {
    /// Maximum records per page, at least 1.
    pub page_size: u32,
    /// Record to start from; the first record when absent.
    pub first_record: Option<DetailRecordId>,
}

/// One query form per read operation the ledger exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryPayload {
    GetAccount {
        account_id: AccountId,
    },
    GetSignatories {
        account_id: AccountId,
    },
    GetAccountTransactions {
        account_id: AccountId,
        pagination: TxPaginationMeta,
    },
    GetAccountAssetTransactions {
        account_id: AccountId,
        asset_id: AssetId,
        pagination: TxPaginationMeta,
    },
    GetTransactions {
        tx_hashes: Vec<Hash>,
    },
    GetAccountAssets {
        account_id: AccountId,
        pagination: AssetPaginationMeta,
    },
    GetAccountDetail {
        account_id: AccountId,
        writer: Option<AccountId>,
        key: Option<String>,
        pagination: Option<DetailPaginationMeta>,
    },
    GetRoles,
    GetRolePermissions {
        role_id: RoleId,
    },
    GetAssetInfo {
        asset_id: AssetId,
    },
    /// Without pagination this is the legacy all-pending form, kept for
    /// compatibility and frozen.
    GetPendingTransactions {
        pagination: Option<TxPaginationMeta>,
    },
    GetBlock {
        height: u64,
    },
    GetPeers,
}

impl QueryPayload {
    /// The dispatch tag of this payload.
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryPayload::GetAccount { .. } => QueryKind::GetAccount,
            QueryPayload::GetSignatories { .. } => QueryKind::GetSignatories,
            QueryPayload::GetAccountTransactions { .. } => QueryKind::GetAccountTransactions,
            QueryPayload::GetAccountAssetTransactions { .. } => {
                QueryKind::GetAccountAssetTransactions
            }
            QueryPayload::GetTransactions { .. } => QueryKind::GetTransactions,
            QueryPayload::GetAccountAssets { .. } => QueryKind::GetAccountAssets,
            QueryPayload::GetAccountDetail { .. } => QueryKind::GetAccountDetail,
            QueryPayload::GetRoles => QueryKind::GetRoles,
            QueryPayload::GetRolePermissions { .. } => QueryKind::GetRolePermissions,
            QueryPayload::GetAssetInfo { .. } => QueryKind::GetAssetInfo,
            QueryPayload::GetPendingTransactions { .. } => QueryKind::GetPendingTransactions,
            QueryPayload::GetBlock { .. } => QueryKind::GetBlock,
            QueryPayload::GetPeers => QueryKind::GetPeers,
        }
    }
}

/// Dispatch tags, one per query form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKind {
    GetAccount,
    GetSignatories,
    GetAccountTransactions,
    GetAccountAssetTransactions,
    GetTransactions,
    GetAccountAssets,
    GetAccountDetail,
    GetRoles,
    GetRolePermissions,
    GetAssetInfo,
    GetPendingTransactions,
    GetBlock,
    GetPeers,
}

/// A signed query against committed state.
///
/// Signature bytes are assumed verified upstream; the engine only matches
/// claimed signer keys against registered signatories when asked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub creator_account_id: AccountId,
    pub created_time_ms: u64,
    pub signatures: Vec<KeyedSignature>,
    pub payload: QueryPayload,
}

impl Query {
    /// Content digest over creator, time, and payload. Signatures are
    /// excluded so re-signing does not change identity.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.creator_account_id.to_string());
        hasher.update(self.created_time_ms.to_le_bytes());
        hasher.update(serde_json::to_vec(&self.payload).unwrap_or_default());
        hasher.finalize().into()
    }
}

/// A blocks-subscription request.
///
/// The engine only authorizes these; stream delivery happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksQuery {
    pub creator_account_id: AccountId,
    pub created_time_ms: u64,
    pub signatures: Vec<KeyedSignature>,
}
