//! World-state error types.

use shared_types::{AccountId, AssetId, DomainId, RoleId};
use thiserror::Error;

/// Errors surfaced by world-state reads and commit hooks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldStateError {
    /// Account row does not exist.
    #[error("no account: {0}")]
    NoAccount(AccountId),

    /// Role row does not exist.
    #[error("no role: {0}")]
    NoRole(RoleId),

    /// Account has no registered signatories (or does not exist).
    #[error("no signatories for: {0}")]
    NoSignatories(AccountId),

    /// The requested detail subtree is absent.
    #[error("no account detail for: {0}")]
    NoAccountDetail(AccountId),

    /// Domain row does not exist.
    #[error("no domain: {0}")]
    NoDomain(DomainId),

    /// Asset row does not exist.
    #[error("no asset: {0}")]
    NoAsset(AssetId),

    /// Pagination start marker unknown, or page size is zero.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// Commit hook tried to create a row that already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),
}
