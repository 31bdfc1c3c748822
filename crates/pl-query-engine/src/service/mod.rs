//! # Query Executor
//!
//! Entry point of the read path. Each execution:
//!
//! 1. rejects kinds disabled by policy,
//! 2. opens one world-state snapshot and pins a chain view clamped to the
//!    snapshot's height,
//! 3. optionally matches claimed signer keys against registered
//!    signatories,
//! 4. asks the authorizer for a decision,
//! 5. runs the handler and wraps the result through the response factory.
//!
//! The snapshot and chain view are plain values dropped on every exit
//! path, success, error, or unwind, so a cancelled query releases its
//! reads without ceremony. The executor itself holds no per-query state
//! and is reentrant: concurrent executions each own their handles.

mod handlers;

use std::sync::Arc;

use shared_types::{AccountId, AssetId, Hash, RolePermission, Transaction};

use pl_block_store::{BlockQuery, BlockStoreError, BlockStoreReader, TxLocation};
use pl_pending_pool::PendingPoolReader;
use pl_world_state::{WorldStateStore, WorldStateView};

use crate::domain::{
    authorize, permissions_of, BlocksQuery, EngineConfig, Query, QueryError, QueryResponse,
    ResponseFactory,
};

use handlers::ExecutionContext;

/// The query execution engine.
pub struct QueryExecutor {
    world_state: Arc<dyn WorldStateStore>,
    block_store: Arc<dyn BlockStoreReader>,
    pending_pool: Arc<dyn PendingPoolReader>,
    config: EngineConfig,
}

impl QueryExecutor {
    pub fn new(
        world_state: Arc<dyn WorldStateStore>,
        block_store: Arc<dyn BlockStoreReader>,
        pending_pool: Arc<dyn PendingPoolReader>,
    ) -> Self {
        Self::with_config(world_state, block_store, pending_pool, EngineConfig::default())
    }

    pub fn with_config(
        world_state: Arc<dyn WorldStateStore>,
        block_store: Arc<dyn BlockStoreReader>,
        pending_pool: Arc<dyn PendingPoolReader>,
        config: EngineConfig,
    ) -> Self {
        Self {
            world_state,
            block_store,
            pending_pool,
            config,
        }
    }

    /// Authorizes and executes one query against committed state.
    ///
    /// With `validate_signatories` set, a query whose claimed signer keys
    /// are not all registered for the creator is rejected before
    /// authorization. Signature bytes themselves are verified upstream.
    pub fn validate_and_execute(&self, query: &Query, validate_signatories: bool) -> QueryResponse {
        let query_hash = query.hash();
        let kind = query.payload.kind();

        if self.config.is_disabled(kind) {
            tracing::warn!("[pl-query] {:?} is disabled by policy", kind);
            return ResponseFactory::error(query_hash, &QueryError::NotSupported(kind));
        }

        // One snapshot per execution; chain reads never run ahead of it.
        let wsv = self.world_state.open_view();
        let chain = ClampedChainView::open(self.block_store.as_ref(), wsv.height());

        let result = self
            .check_signatories(wsv.as_ref(), query, validate_signatories)
            .and_then(|_| authorize(wsv.as_ref(), &query.creator_account_id, &query.payload))
            .and_then(|_| {
                ExecutionContext {
                    wsv: wsv.as_ref(),
                    chain: &chain,
                    pending: self.pending_pool.as_ref(),
                    creator: &query.creator_account_id,
                }
                .execute(&query.payload)
            });

        match result {
            Ok(payload) => {
                tracing::debug!("[pl-query] {:?} for {} ok", kind, query.creator_account_id);
                ResponseFactory::success(query_hash, payload)
            }
            Err(error) => {
                tracing::debug!(
                    "[pl-query] {:?} for {} failed: {}",
                    kind,
                    query.creator_account_id,
                    error
                );
                ResponseFactory::error(query_hash, &error)
            }
        }
    }

    /// Blocks-subscription authorization: the caller needs `GetBlocks` or
    /// `Root`. Stream delivery happens outside the engine.
    pub fn validate(&self, blocks_query: &BlocksQuery) -> bool {
        let wsv = self.world_state.open_view();
        let held = permissions_of(wsv.as_ref(), &blocks_query.creator_account_id);
        held.has(RolePermission::Root) || held.has(RolePermission::GetBlocks)
    }

    fn check_signatories(
        &self,
        wsv: &dyn WorldStateView,
        query: &Query,
        validate_signatories: bool,
    ) -> Result<(), QueryError> {
        if !validate_signatories {
            return Ok(());
        }
        let registered = wsv
            .signatories(&query.creator_account_id)
            .map_err(|_| QueryError::SignatoryMismatch)?;
        let matched = !query.signatures.is_empty()
            && query
                .signatures
                .iter()
                .all(|sig| registered.contains(&sig.public_key));
        if matched {
            Ok(())
        } else {
            Err(QueryError::SignatoryMismatch)
        }
    }
}

/// A chain view that refuses to see past the world-state snapshot it was
/// paired with. Keeps one query execution on a single consistent height
/// even while blocks land concurrently.
struct ClampedChainView {
    inner: Box<dyn BlockQuery>,
    max_height: u64,
}

impl ClampedChainView {
    fn open(store: &dyn BlockStoreReader, snapshot_height: u64) -> Self {
        let inner = store.open_view();
        let max_height = inner.height().min(snapshot_height);
        Self { inner, max_height }
    }
}

impl BlockQuery for ClampedChainView {
    fn height(&self) -> u64 {
        self.max_height
    }

    fn block(&self, height: u64) -> Result<shared_types::Block, BlockStoreError> {
        if height == 0 || height > self.max_height {
            return Err(BlockStoreError::InvalidHeight {
                height,
                current: self.max_height,
            });
        }
        self.inner.block(height)
    }

    fn transaction(&self, hash: &Hash) -> Option<(Transaction, TxLocation)> {
        self.inner
            .transaction(hash)
            .filter(|(_, location)| location.height <= self.max_height)
    }

    fn account_transactions(&self, account: &AccountId) -> Vec<(Transaction, TxLocation)> {
        let mut matching = self.inner.account_transactions(account);
        matching.retain(|(_, location)| location.height <= self.max_height);
        matching
    }

    fn account_asset_transactions(
        &self,
        account: &AccountId,
        asset: &AssetId,
    ) -> Vec<(Transaction, TxLocation)> {
        let mut matching = self.inner.account_asset_transactions(account, asset);
        matching.retain(|(_, location)| location.height <= self.max_height);
        matching
    }
}
