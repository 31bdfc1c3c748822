//! # World-State Ports
//!
//! The read contract consumed by the query engine.
//!
//! `WorldStateView` is one consistent snapshot: every method observes the
//! same committed height, no matter what commits land concurrently. A view
//! is opened per query execution and dropped when the query finishes.

use shared_types::{
    Account, AccountId, Asset, AssetId, GrantablePermission, Peer, PublicKey, RoleId,
    RolePermissionSet,
};

use crate::domain::{AccountAssetsPage, AccountDetailPage, DetailPaging, WorldStateError};

/// One consistent read-only snapshot of the world state.
pub trait WorldStateView: Send + Sync {
    /// Height of the last committed block this view reflects.
    fn height(&self) -> u64;

    /// Account row, or `None` when the id references nothing.
    fn account(&self, id: &AccountId) -> Option<Account>;

    /// Role ids held by the account.
    fn account_roles(&self, id: &AccountId) -> Result<Vec<RoleId>, WorldStateError>;

    /// Permission set of one role.
    fn role_permissions(&self, id: &RoleId) -> Result<RolePermissionSet, WorldStateError>;

    /// All role ids in insertion order.
    fn roles(&self) -> Vec<RoleId>;

    /// Signatory keys of the account; missing and empty are the same error.
    fn signatories(&self, id: &AccountId) -> Result<Vec<PublicKey>, WorldStateError>;

    /// Asset row, or `None` when the id references nothing.
    fn asset(&self, id: &AssetId) -> Option<Asset>;

    /// One page of the account's balances, ascending by asset id.
    fn account_assets(
        &self,
        id: &AccountId,
        page_size: u32,
        first: Option<&AssetId>,
    ) -> Result<AccountAssetsPage, WorldStateError>;

    /// One page of the account's detail records.
    fn account_detail(
        &self,
        id: &AccountId,
        writer: Option<&AccountId>,
        key: Option<&str>,
        paging: Option<&DetailPaging>,
    ) -> Result<AccountDetailPage, WorldStateError>;

    /// All known peers.
    fn peers(&self) -> Vec<Peer>;

    /// Whether `grantor` delegated `kind` to `grantee`.
    fn has_grantable(
        &self,
        grantor: &AccountId,
        grantee: &AccountId,
        kind: GrantablePermission,
    ) -> bool;
}

/// A store that can open consistent snapshots.
///
/// Views opened later never observe an older height than views opened
/// earlier.
pub trait WorldStateStore: Send + Sync {
    fn open_view(&self) -> Box<dyn WorldStateView>;
}
