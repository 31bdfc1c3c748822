//! # In-Memory World-State Store
//!
//! Copy-on-write store: the current `WorldState` lives behind an `Arc`
//! that is swapped atomically on commit. Opening a view clones the `Arc`,
//! so a running query keeps reading the state it started with while
//! commits replace the published value.

use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{
    Account, AccountId, Asset, AssetId, GrantablePermission, Peer, PublicKey, RoleId,
    RolePermissionSet,
};

use crate::domain::{
    AccountAssetsPage, AccountDetailPage, DetailPaging, WorldState, WorldStateError,
};
use crate::ports::{WorldStateStore, WorldStateView};

/// Shared in-memory world-state store.
#[derive(Default)]
pub struct InMemoryWorldState {
    state: RwLock<Arc<WorldState>>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one committed block's effects.
    ///
    /// The mutation runs on a private clone; the published state is only
    /// replaced when the closure succeeds, so readers never observe a
    /// half-applied commit.
    pub fn commit<F>(&self, mutate: F) -> Result<(), WorldStateError>
    where
        F: FnOnce(&mut WorldState) -> Result<(), WorldStateError>,
    {
        let mut guard = self.state.write();
        let mut next = (**guard).clone();
        mutate(&mut next)?;
        tracing::debug!("[pl-wsv] committed state at height {}", next.height());
        *guard = Arc::new(next);
        Ok(())
    }

    /// Current committed height.
    pub fn height(&self) -> u64 {
        self.state.read().height()
    }
}

impl WorldStateStore for InMemoryWorldState {
    fn open_view(&self) -> Box<dyn WorldStateView> {
        Box::new(WorldStateSnapshot {
            state: Arc::clone(&self.state.read()),
        })
    }
}

/// A pinned snapshot of the world state.
pub struct WorldStateSnapshot {
    state: Arc<WorldState>,
}

impl WorldStateView for WorldStateSnapshot {
    fn height(&self) -> u64 {
        self.state.height()
    }

    fn account(&self, id: &AccountId) -> Option<Account> {
        self.state.account(id)
    }

    fn account_roles(&self, id: &AccountId) -> Result<Vec<RoleId>, WorldStateError> {
        self.state.account_roles(id)
    }

    fn role_permissions(&self, id: &RoleId) -> Result<RolePermissionSet, WorldStateError> {
        self.state.role_permissions(id)
    }

    fn roles(&self) -> Vec<RoleId> {
        self.state.roles()
    }

    fn signatories(&self, id: &AccountId) -> Result<Vec<PublicKey>, WorldStateError> {
        self.state.signatories(id)
    }

    fn asset(&self, id: &AssetId) -> Option<Asset> {
        self.state.asset(id)
    }

    fn account_assets(
        &self,
        id: &AccountId,
        page_size: u32,
        first: Option<&AssetId>,
    ) -> Result<AccountAssetsPage, WorldStateError> {
        self.state.account_assets(id, page_size, first)
    }

    fn account_detail(
        &self,
        id: &AccountId,
        writer: Option<&AccountId>,
        key: Option<&str>,
        paging: Option<&DetailPaging>,
    ) -> Result<AccountDetailPage, WorldStateError> {
        self.state.account_detail(id, writer, key, paging)
    }

    fn peers(&self) -> Vec<Peer> {
        self.state.peers()
    }

    fn has_grantable(
        &self,
        grantor: &AccountId,
        grantee: &AccountId,
        kind: GrantablePermission,
    ) -> bool {
        self.state.has_grantable(grantor, grantee, kind)
    }
}
