//! # Query Handlers
//!
//! One handler per query form. Each runs after authorization and emits
//! the first matching error of its contract: id-validity, then pagination
//! validity, then entity existence.

use shared_types::{AccountId, AssetId, Hash, RoleId, RolePermission, Transaction};

use pl_block_store::{BlockQuery, BlockStoreError, TxLocation};
use pl_pending_pool::{PendingPoolError, PendingPoolReader};
use pl_world_state::{DetailPaging, WorldStateError, WorldStateView};

use crate::domain::authorizer::permissions_of;
use crate::domain::errors::QueryError;
use crate::domain::query::{
    AssetPaginationMeta, DetailPaginationMeta, QueryPayload, TxPaginationMeta,
};
use crate::domain::response::{
    AccountAssetsResponse, AccountDetailResponse, AccountResponse, AssetResponse, BlockResponse,
    PeersResponse, PendingTransactionsPageResponse, ResponsePayload, RolePermissionsResponse,
    RolesResponse, SignatoriesResponse, TransactionsPageResponse, TransactionsResponse,
};

/// The read handles one query execution owns: one world-state snapshot,
/// one chain view clamped to it, and the real-time pending pool.
pub(crate) struct ExecutionContext<'a> {
    pub wsv: &'a dyn WorldStateView,
    pub chain: &'a dyn BlockQuery,
    pub pending: &'a dyn PendingPoolReader,
    pub creator: &'a AccountId,
}

impl ExecutionContext<'_> {
    /// Dispatches to the handler for this payload.
    pub fn execute(&self, payload: &QueryPayload) -> Result<ResponsePayload, QueryError> {
        match payload {
            QueryPayload::GetAccount { account_id } => self.get_account(account_id),
            QueryPayload::GetSignatories { account_id } => self.get_signatories(account_id),
            QueryPayload::GetAccountTransactions {
                account_id,
                pagination,
            } => self.get_account_transactions(account_id, pagination),
            QueryPayload::GetAccountAssetTransactions {
                account_id,
                asset_id,
                pagination,
            } => self.get_account_asset_transactions(account_id, asset_id, pagination),
            QueryPayload::GetTransactions { tx_hashes } => self.get_transactions(tx_hashes),
            QueryPayload::GetAccountAssets {
                account_id,
                pagination,
            } => self.get_account_assets(account_id, pagination),
            QueryPayload::GetAccountDetail {
                account_id,
                writer,
                key,
                pagination,
            } => self.get_account_detail(account_id, writer.as_ref(), key.as_deref(), pagination.as_ref()),
            QueryPayload::GetRoles => self.get_roles(),
            QueryPayload::GetRolePermissions { role_id } => self.get_role_permissions(role_id),
            QueryPayload::GetAssetInfo { asset_id } => self.get_asset_info(asset_id),
            QueryPayload::GetPendingTransactions { pagination } => {
                self.get_pending_transactions(pagination.as_ref())
            }
            QueryPayload::GetBlock { height } => self.get_block(*height),
            QueryPayload::GetPeers => self.get_peers(),
        }
    }

    fn get_account(&self, target: &AccountId) -> Result<ResponsePayload, QueryError> {
        let account = self
            .wsv
            .account(target)
            .ok_or_else(|| QueryError::NoAccount(target.clone()))?;
        let roles = self
            .wsv
            .account_roles(target)
            .map_err(|_| QueryError::NoAccount(target.clone()))?;
        Ok(ResponsePayload::Account(AccountResponse { account, roles }))
    }

    fn get_signatories(&self, target: &AccountId) -> Result<ResponsePayload, QueryError> {
        let keys = self
            .wsv
            .signatories(target)
            .map_err(|_| QueryError::NoSignatories(target.clone()))?;
        Ok(ResponsePayload::Signatories(SignatoriesResponse { keys }))
    }

    fn get_account_transactions(
        &self,
        target: &AccountId,
        pagination: &TxPaginationMeta,
    ) -> Result<ResponsePayload, QueryError> {
        if self.wsv.account(target).is_none() {
            return Err(QueryError::InvalidAccountId(target.clone()));
        }
        let matching = self.chain.account_transactions(target);
        Ok(ResponsePayload::TransactionsPage(paginate_transactions(
            matching, pagination,
        )?))
    }

    /// Account existence is checked before asset existence when both are
    /// absent.
    fn get_account_asset_transactions(
        &self,
        target: &AccountId,
        asset: &AssetId,
        pagination: &TxPaginationMeta,
    ) -> Result<ResponsePayload, QueryError> {
        if self.wsv.account(target).is_none() {
            return Err(QueryError::InvalidAccountId(target.clone()));
        }
        if self.wsv.asset(asset).is_none() {
            return Err(QueryError::InvalidAssetId(asset.clone()));
        }
        let matching = self.chain.account_asset_transactions(target, asset);
        Ok(ResponsePayload::TransactionsPage(paginate_transactions(
            matching, pagination,
        )?))
    }

    /// Permission is per transaction: `GetAllTxs` (or `Root`) reaches
    /// everything, `GetMyTxs` only transactions the caller created. Once
    /// permitted, every listed hash must resolve or the whole query fails.
    fn get_transactions(&self, hashes: &[Hash]) -> Result<ResponsePayload, QueryError> {
        let held = permissions_of(self.wsv, self.creator);
        let resolved: Vec<Option<Transaction>> = hashes
            .iter()
            .map(|hash| self.chain.transaction(hash).map(|(tx, _)| tx))
            .collect();

        let unrestricted =
            held.has(RolePermission::Root) || held.has(RolePermission::GetAllTxs);
        if !unrestricted {
            let all_mine = held.has(RolePermission::GetMyTxs)
                && resolved.iter().all(|tx| {
                    tx.as_ref()
                        .is_some_and(|tx| &tx.creator_account_id == self.creator)
                });
            if !all_mine {
                return Err(QueryError::NoPermissions);
            }
        }

        if resolved.iter().any(Option::is_none) {
            return Err(QueryError::UnknownTransactionHashes);
        }
        Ok(ResponsePayload::Transactions(TransactionsResponse {
            transactions: resolved.into_iter().flatten().collect(),
        }))
    }

    fn get_account_assets(
        &self,
        target: &AccountId,
        pagination: &AssetPaginationMeta,
    ) -> Result<ResponsePayload, QueryError> {
        if pagination.page_size == 0 {
            return Err(QueryError::InvalidPagination {
                reason: "page size must be at least 1".into(),
            });
        }
        let page = self
            .wsv
            .account_assets(target, pagination.page_size, pagination.first_asset_id.as_ref())
            .map_err(|err| match err {
                WorldStateError::InvalidPagination(reason) => {
                    QueryError::InvalidPagination { reason }
                }
                _ => QueryError::NoAccountAssets(target.clone()),
            })?;
        Ok(ResponsePayload::AccountAssets(AccountAssetsResponse {
            assets: page.assets,
            total: page.total,
            next_asset_id: page.next_asset_id,
        }))
    }

    fn get_account_detail(
        &self,
        target: &AccountId,
        writer: Option<&AccountId>,
        key: Option<&str>,
        pagination: Option<&DetailPaginationMeta>,
    ) -> Result<ResponsePayload, QueryError> {
        let paging = pagination.map(|meta| DetailPaging {
            page_size: meta.page_size,
            first: meta.first_record.clone(),
        });
        let page = self
            .wsv
            .account_detail(target, writer, key, paging.as_ref())
            .map_err(|err| match err {
                WorldStateError::InvalidPagination(reason) => {
                    QueryError::InvalidPagination { reason }
                }
                _ => QueryError::NoAccountDetail(target.clone()),
            })?;
        Ok(ResponsePayload::AccountDetail(AccountDetailResponse {
            detail: page.detail,
            total: page.total,
            next_record: page.next_record,
        }))
    }

    fn get_roles(&self) -> Result<ResponsePayload, QueryError> {
        Ok(ResponsePayload::Roles(RolesResponse {
            roles: self.wsv.roles(),
        }))
    }

    fn get_role_permissions(&self, role: &RoleId) -> Result<ResponsePayload, QueryError> {
        let permissions = self
            .wsv
            .role_permissions(role)
            .map_err(|_| QueryError::NoRoles(role.clone()))?;
        Ok(ResponsePayload::RolePermissions(RolePermissionsResponse {
            permissions,
        }))
    }

    fn get_asset_info(&self, asset: &AssetId) -> Result<ResponsePayload, QueryError> {
        let asset = self
            .wsv
            .asset(asset)
            .ok_or_else(|| QueryError::NoAsset(asset.clone()))?;
        Ok(ResponsePayload::Asset(AssetResponse { asset }))
    }

    fn get_pending_transactions(
        &self,
        pagination: Option<&TxPaginationMeta>,
    ) -> Result<ResponsePayload, QueryError> {
        let Some(meta) = pagination else {
            // Legacy unpaged form: everything pending for the caller.
            return Ok(ResponsePayload::Transactions(TransactionsResponse {
                transactions: self.pending.pending_for(self.creator),
            }));
        };
        if meta.page_size == 0 {
            return Err(QueryError::InvalidPagination {
                reason: "page size must be at least 1".into(),
            });
        }
        let page = self
            .pending
            .pending_page(self.creator, meta.page_size, meta.first_tx_hash.as_ref())
            .map_err(|err| match err {
                PendingPoolError::NotFound { hash } => QueryError::InvalidPagination {
                    reason: format!("no pending transaction {}", hex::encode(hash)),
                },
                other => QueryError::InvalidPagination {
                    reason: other.to_string(),
                },
            })?;
        Ok(ResponsePayload::PendingTransactionsPage(
            PendingTransactionsPageResponse {
                transactions: page.transactions,
                next_tx_hash: page.next_tx_hash,
                total: page.total,
            },
        ))
    }

    fn get_block(&self, height: u64) -> Result<ResponsePayload, QueryError> {
        let block = self.chain.block(height).map_err(|err| match err {
            BlockStoreError::InvalidHeight { height, current } => {
                QueryError::InvalidHeight { height, current }
            }
            _ => QueryError::InvalidHeight {
                height,
                current: self.chain.height(),
            },
        })?;
        Ok(ResponsePayload::Block(BlockResponse { block }))
    }

    fn get_peers(&self) -> Result<ResponsePayload, QueryError> {
        Ok(ResponsePayload::Peers(PeersResponse {
            peers: self.wsv.peers(),
        }))
    }
}

/// Cuts one page out of an ascending `(height, index)` transaction list.
///
/// The start marker must name a transaction in the list; a hash that is
/// committed but belongs to a different stream is as unknown as one that
/// was never committed.
fn paginate_transactions(
    matching: Vec<(Transaction, TxLocation)>,
    pagination: &TxPaginationMeta,
) -> Result<TransactionsPageResponse, QueryError> {
    if pagination.page_size == 0 {
        return Err(QueryError::InvalidPagination {
            reason: "page size must be at least 1".into(),
        });
    }

    let total = matching.len() as u64;
    let start = match &pagination.first_tx_hash {
        None => 0,
        Some(first) => matching
            .iter()
            .position(|(tx, _)| &tx.hash() == first)
            .ok_or_else(|| QueryError::InvalidPagination {
                reason: format!("unknown first transaction {}", hex::encode(first)),
            })?,
    };

    let end = matching.len().min(start + pagination.page_size as usize);
    let transactions = matching[start..end]
        .iter()
        .map(|(tx, _)| tx.clone())
        .collect();
    let next_tx_hash = matching.get(end).map(|(tx, _)| tx.hash());

    Ok(TransactionsPageResponse {
        transactions,
        next_tx_hash,
        total,
    })
}
