//! # Query Errors
//!
//! Every way a query can fail statefully, with the stable `(kind, code)`
//! surface it maps onto.
//!
//! Precedence per handler: authorization, then id-validity, then
//! pagination validity, then entity existence. Handlers emit the first
//! matching error. Storage faults are not represented here; they abort
//! the query and surface to the transport layer.

use shared_types::{AccountId, AssetId, RoleId};
use thiserror::Error;

use super::query::QueryKind;
use super::response::QueryErrorKind;

/// Stable error codes on the wire.
pub mod error_code {
    pub const NO_STATEFUL_ERROR: u32 = 0;
    pub const NO_PERMISSIONS: u32 = 2;
    pub const INVALID_HEIGHT: u32 = 3;
    pub const INVALID_PAGINATION: u32 = 4;
    pub const INVALID_ACCOUNT_ID: u32 = 5;
    pub const INVALID_ASSET_ID: u32 = 6;
}

/// A stateful query failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Creator holds none of the permissions the query requires.
    #[error("creator lacks the permissions this query requires")]
    NoPermissions,

    /// Signatory validation was requested and no claimed signer key is
    /// registered for the creator.
    #[error("no signatory of the creator matches the claimed signer")]
    SignatoryMismatch,

    /// Height 0 or beyond the chain tip.
    #[error("invalid height {height}: chain tip is {current}")]
    InvalidHeight { height: u64, current: u64 },

    /// Page size 0 or an unknown pagination start marker.
    #[error("invalid pagination: {reason}")]
    InvalidPagination { reason: String },

    /// A requested transaction hash names nothing committed.
    #[error("request names unknown transaction hashes")]
    UnknownTransactionHashes,

    /// Well-formed account id that references nothing.
    #[error("account id references nothing: {0}")]
    InvalidAccountId(AccountId),

    /// Well-formed asset id that references nothing.
    #[error("asset id references nothing: {0}")]
    InvalidAssetId(AssetId),

    /// Target account row is absent.
    #[error("no account: {0}")]
    NoAccount(AccountId),

    /// Target account has no signatories (or does not exist).
    #[error("no signatories for: {0}")]
    NoSignatories(AccountId),

    /// Target account of a balance query is absent.
    #[error("no account assets for: {0}")]
    NoAccountAssets(AccountId),

    /// The requested detail subtree is absent.
    #[error("no account detail for: {0}")]
    NoAccountDetail(AccountId),

    /// Role row is absent.
    #[error("no role: {0}")]
    NoRoles(RoleId),

    /// Asset row is absent.
    #[error("no asset: {0}")]
    NoAsset(AssetId),

    /// Query kind disabled by policy.
    #[error("query kind not supported: {0:?}")]
    NotSupported(QueryKind),
}

impl QueryError {
    /// The wire taxonomy kind this error maps onto.
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            QueryError::NoPermissions
            | QueryError::SignatoryMismatch
            | QueryError::InvalidHeight { .. }
            | QueryError::InvalidPagination { .. }
            | QueryError::UnknownTransactionHashes
            | QueryError::InvalidAccountId(_)
            | QueryError::InvalidAssetId(_) => QueryErrorKind::StatefulFailed,
            QueryError::NoAccount(_) => QueryErrorKind::NoAccount,
            QueryError::NoSignatories(_) => QueryErrorKind::NoSignatories,
            QueryError::NoAccountAssets(_) => QueryErrorKind::NoAccountAssets,
            QueryError::NoAccountDetail(_) => QueryErrorKind::NoAccountDetail,
            QueryError::NoRoles(_) => QueryErrorKind::NoRoles,
            QueryError::NoAsset(_) => QueryErrorKind::NoAsset,
            QueryError::NotSupported(_) => QueryErrorKind::NotSupported,
        }
    }

    /// The stable wire code this error maps onto.
    pub fn code(&self) -> u32 {
        match self {
            QueryError::NoPermissions | QueryError::SignatoryMismatch => {
                error_code::NO_PERMISSIONS
            }
            QueryError::InvalidHeight { .. } => error_code::INVALID_HEIGHT,
            QueryError::InvalidPagination { .. } | QueryError::UnknownTransactionHashes => {
                error_code::INVALID_PAGINATION
            }
            QueryError::InvalidAccountId(_) => error_code::INVALID_ACCOUNT_ID,
            QueryError::InvalidAssetId(_) => error_code::INVALID_ASSET_ID,
            _ => error_code::NO_STATEFUL_ERROR,
        }
    }
}
