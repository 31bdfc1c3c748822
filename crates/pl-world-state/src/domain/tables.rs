//! # World-State Tables
//!
//! The relational-shaped world state produced by applying all committed
//! blocks: domains, accounts, roles, assets, balances, signatories, detail
//! records, grantable-permission edges, and peers.
//!
//! `WorldState` is a plain cloneable value. The store adapter publishes it
//! behind an `Arc` and replaces the whole value on commit, which is what
//! gives readers snapshot isolation.
//!
//! ## Invariants
//!
//! - Every account references an existing domain and holds at least one role.
//! - Every balance row references an existing account and asset.
//! - Roles keep their insertion order.

use std::collections::{BTreeMap, HashMap, HashSet};

use shared_types::{
    Account, AccountAsset, AccountId, Amount, Asset, AssetId, Domain, DomainId,
    GrantablePermission, Peer, PublicKey, Role, RoleId, RolePermissionSet,
};

use super::errors::WorldStateError;
use super::value_objects::{AccountAssetsPage, AccountDetailPage, DetailPaging, DetailRecordId};

#[derive(Debug, Clone)]
struct AccountRow {
    domain_id: DomainId,
    quorum: u32,
}

/// All world-state tables at one committed height.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    height: u64,
    domains: HashMap<DomainId, Domain>,
    accounts: HashMap<AccountId, AccountRow>,
    roles: Vec<Role>,
    account_roles: HashMap<AccountId, Vec<RoleId>>,
    signatories: HashMap<AccountId, Vec<PublicKey>>,
    assets: HashMap<AssetId, Asset>,
    balances: HashMap<AccountId, BTreeMap<AssetId, Amount>>,
    details: HashMap<AccountId, BTreeMap<AccountId, BTreeMap<String, String>>>,
    grants: HashSet<(AccountId, AccountId, GrantablePermission)>,
    peers: Vec<Peer>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------- reads

    /// Height of the last block applied to this state.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Full account row, detail records materialized as `json_data`.
    pub fn account(&self, id: &AccountId) -> Option<Account> {
        let row = self.accounts.get(id)?;
        Some(Account {
            id: id.clone(),
            domain_id: row.domain_id.clone(),
            quorum: row.quorum,
            json_data: self.detail_json(id, None, None),
        })
    }

    /// Role ids held by the account, in append order.
    pub fn account_roles(&self, id: &AccountId) -> Result<Vec<RoleId>, WorldStateError> {
        self.account_roles
            .get(id)
            .cloned()
            .ok_or_else(|| WorldStateError::NoAccount(id.clone()))
    }

    /// Permission set of one role.
    pub fn role_permissions(&self, id: &RoleId) -> Result<RolePermissionSet, WorldStateError> {
        self.roles
            .iter()
            .find(|role| &role.id == id)
            .map(|role| role.permissions)
            .ok_or_else(|| WorldStateError::NoRole(id.clone()))
    }

    /// All role ids in insertion order.
    pub fn roles(&self) -> Vec<RoleId> {
        self.roles.iter().map(|role| role.id.clone()).collect()
    }

    /// Public keys registered for the account.
    ///
    /// A missing account and an account with an empty key list are the
    /// same condition to callers.
    pub fn signatories(&self, id: &AccountId) -> Result<Vec<PublicKey>, WorldStateError> {
        match self.signatories.get(id) {
            Some(keys) if !keys.is_empty() => Ok(keys.clone()),
            _ => Err(WorldStateError::NoSignatories(id.clone())),
        }
    }

    /// Asset row.
    pub fn asset(&self, id: &AssetId) -> Option<Asset> {
        self.assets.get(id).cloned()
    }

    /// One page of the account's balances, ascending by asset id.
    pub fn account_assets(
        &self,
        id: &AccountId,
        page_size: u32,
        first: Option<&AssetId>,
    ) -> Result<AccountAssetsPage, WorldStateError> {
        if !self.accounts.contains_key(id) {
            return Err(WorldStateError::NoAccount(id.clone()));
        }
        if page_size == 0 {
            return Err(WorldStateError::InvalidPagination(
                "page size must be at least 1".into(),
            ));
        }

        static EMPTY: BTreeMap<AssetId, Amount> = BTreeMap::new();
        let balances = self.balances.get(id).unwrap_or(&EMPTY);
        let entries: Vec<(&AssetId, &Amount)> = balances.iter().collect();

        let start = match first {
            None => 0,
            Some(asset_id) => entries
                .iter()
                .position(|(candidate, _)| *candidate == asset_id)
                .ok_or_else(|| {
                    WorldStateError::InvalidPagination(format!(
                        "first asset {asset_id} is not held by {id}"
                    ))
                })?,
        };

        let end = entries.len().min(start + page_size as usize);
        let assets = entries[start..end]
            .iter()
            .map(|(asset_id, balance)| {
                let precision = self
                    .assets
                    .get(*asset_id)
                    .map_or(0, |asset| asset.precision);
                AccountAsset {
                    account_id: id.clone(),
                    asset_id: (*asset_id).clone(),
                    balance: **balance,
                    balance_decimal: balance.to_decimal_string(precision),
                }
            })
            .collect();

        Ok(AccountAssetsPage {
            assets,
            total: entries.len() as u64,
            next_asset_id: entries.get(end).map(|(asset_id, _)| (*asset_id).clone()),
        })
    }

    /// One page of the account's detail records, filtered by writer and/or
    /// key, ordered by `(writer, key)`.
    pub fn account_detail(
        &self,
        id: &AccountId,
        writer: Option<&AccountId>,
        key: Option<&str>,
        paging: Option<&DetailPaging>,
    ) -> Result<AccountDetailPage, WorldStateError> {
        if !self.accounts.contains_key(id) {
            return Err(WorldStateError::NoAccountDetail(id.clone()));
        }

        let records = self.detail_records(id, writer, key);
        if records.is_empty() && (writer.is_some() || key.is_some()) {
            return Err(WorldStateError::NoAccountDetail(id.clone()));
        }
        let total = records.len() as u64;

        let (page, next_record) = match paging {
            None => (records.as_slice(), None),
            Some(paging) => {
                if paging.page_size == 0 {
                    return Err(WorldStateError::InvalidPagination(
                        "page size must be at least 1".into(),
                    ));
                }
                let start = match &paging.first {
                    None => 0,
                    Some(first) => records
                        .iter()
                        .position(|(writer, key, _)| writer == &first.writer && key == &first.key)
                        .ok_or_else(|| {
                            WorldStateError::InvalidPagination(format!(
                                "unknown first record {}/{}",
                                first.writer, first.key
                            ))
                        })?,
                };
                let end = records.len().min(start + paging.page_size as usize);
                let next = records.get(end).map(|(writer, key, _)| DetailRecordId {
                    writer: writer.clone(),
                    key: key.clone(),
                });
                (&records[start..end], next)
            }
        };

        let mut by_writer = serde_json::Map::new();
        for (writer, key, value) in page {
            if let Some(keys) = by_writer
                .entry(writer.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()))
                .as_object_mut()
            {
                keys.insert(key.clone(), serde_json::Value::String(value.clone()));
            }
        }

        Ok(AccountDetailPage {
            detail: serde_json::Value::Object(by_writer),
            total,
            next_record,
        })
    }

    /// All known peers in registration order.
    pub fn peers(&self) -> Vec<Peer> {
        self.peers.clone()
    }

    /// Whether `grantor` delegated `kind` to `grantee`.
    pub fn has_grantable(
        &self,
        grantor: &AccountId,
        grantee: &AccountId,
        kind: GrantablePermission,
    ) -> bool {
        self.grants
            .contains(&(grantor.clone(), grantee.clone(), kind))
    }

    fn detail_records(
        &self,
        id: &AccountId,
        writer: Option<&AccountId>,
        key: Option<&str>,
    ) -> Vec<(AccountId, String, String)> {
        let mut records = Vec::new();
        if let Some(by_writer) = self.details.get(id) {
            for (record_writer, keys) in by_writer {
                if writer.is_some_and(|w| w != record_writer) {
                    continue;
                }
                for (record_key, value) in keys {
                    if key.is_some_and(|k| k != record_key) {
                        continue;
                    }
                    records.push((record_writer.clone(), record_key.clone(), value.clone()));
                }
            }
        }
        records
    }

    fn detail_json(
        &self,
        id: &AccountId,
        writer: Option<&AccountId>,
        key: Option<&str>,
    ) -> serde_json::Value {
        let mut by_writer = serde_json::Map::new();
        for (record_writer, record_key, value) in self.detail_records(id, writer, key) {
            if let Some(keys) = by_writer
                .entry(record_writer.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()))
                .as_object_mut()
            {
                keys.insert(record_key, serde_json::Value::String(value));
            }
        }
        serde_json::Value::Object(by_writer)
    }

    // ---------------------------------------------------- commit hooks

    /// Records the height of the block whose effects this state reflects.
    pub fn set_height(&mut self, height: u64) {
        self.height = height;
    }

    pub fn create_role(
        &mut self,
        id: RoleId,
        permissions: RolePermissionSet,
    ) -> Result<(), WorldStateError> {
        if self.roles.iter().any(|role| role.id == id) {
            return Err(WorldStateError::AlreadyExists(format!("role {id}")));
        }
        self.roles.push(Role { id, permissions });
        Ok(())
    }

    pub fn create_domain(
        &mut self,
        id: DomainId,
        default_role: RoleId,
    ) -> Result<(), WorldStateError> {
        if self.roles.iter().all(|role| role.id != default_role) {
            return Err(WorldStateError::NoRole(default_role));
        }
        if self.domains.contains_key(&id) {
            return Err(WorldStateError::AlreadyExists(format!("domain {id}")));
        }
        self.domains.insert(id.clone(), Domain { id, default_role });
        Ok(())
    }

    /// Creates an account in `domain`, assigning the domain's default role
    /// and registering `public_key` as its first signatory.
    pub fn create_account(
        &mut self,
        id: AccountId,
        public_key: PublicKey,
    ) -> Result<(), WorldStateError> {
        let domain = self
            .domains
            .get(id.domain())
            .ok_or_else(|| WorldStateError::NoDomain(id.domain().to_owned()))?
            .clone();
        if self.accounts.contains_key(&id) {
            return Err(WorldStateError::AlreadyExists(format!("account {id}")));
        }
        self.accounts.insert(
            id.clone(),
            AccountRow {
                domain_id: domain.id,
                quorum: 1,
            },
        );
        self.account_roles
            .insert(id.clone(), vec![domain.default_role]);
        self.signatories.insert(id, vec![public_key]);
        Ok(())
    }

    pub fn append_role(&mut self, id: &AccountId, role: RoleId) -> Result<(), WorldStateError> {
        if self.roles.iter().all(|candidate| candidate.id != role) {
            return Err(WorldStateError::NoRole(role));
        }
        let roles = self
            .account_roles
            .get_mut(id)
            .ok_or_else(|| WorldStateError::NoAccount(id.clone()))?;
        if !roles.contains(&role) {
            roles.push(role);
        }
        Ok(())
    }

    pub fn add_signatory(&mut self, id: &AccountId, key: PublicKey) -> Result<(), WorldStateError> {
        let keys = self
            .signatories
            .get_mut(id)
            .ok_or_else(|| WorldStateError::NoAccount(id.clone()))?;
        if !keys.contains(&key) {
            keys.push(key);
        }
        Ok(())
    }

    pub fn create_asset(&mut self, id: AssetId, precision: u8) -> Result<(), WorldStateError> {
        if !self.domains.contains_key(id.domain()) {
            return Err(WorldStateError::NoDomain(id.domain().to_owned()));
        }
        if self.assets.contains_key(&id) {
            return Err(WorldStateError::AlreadyExists(format!("asset {id}")));
        }
        let domain_id = id.domain().to_owned();
        self.assets.insert(
            id.clone(),
            Asset {
                id,
                domain_id,
                precision,
            },
        );
        Ok(())
    }

    pub fn add_asset_quantity(
        &mut self,
        id: &AccountId,
        asset_id: &AssetId,
        amount: Amount,
    ) -> Result<(), WorldStateError> {
        if !self.accounts.contains_key(id) {
            return Err(WorldStateError::NoAccount(id.clone()));
        }
        if !self.assets.contains_key(asset_id) {
            return Err(WorldStateError::NoAsset(asset_id.clone()));
        }
        let balance = self
            .balances
            .entry(id.clone())
            .or_default()
            .entry(asset_id.clone())
            .or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| WorldStateError::AlreadyExists(format!("balance overflow for {id}")))?;
        Ok(())
    }

    pub fn set_account_detail(
        &mut self,
        id: &AccountId,
        writer: AccountId,
        key: String,
        value: String,
    ) -> Result<(), WorldStateError> {
        if !self.accounts.contains_key(id) {
            return Err(WorldStateError::NoAccount(id.clone()));
        }
        self.details
            .entry(id.clone())
            .or_default()
            .entry(writer)
            .or_default()
            .insert(key, value);
        Ok(())
    }

    pub fn grant_permission(
        &mut self,
        grantor: &AccountId,
        grantee: &AccountId,
        kind: GrantablePermission,
    ) -> Result<(), WorldStateError> {
        if !self.accounts.contains_key(grantor) {
            return Err(WorldStateError::NoAccount(grantor.clone()));
        }
        if !self.accounts.contains_key(grantee) {
            return Err(WorldStateError::NoAccount(grantee.clone()));
        }
        self.grants
            .insert((grantor.clone(), grantee.clone(), kind));
        Ok(())
    }

    pub fn add_peer(&mut self, peer: Peer) {
        self.peers.push(peer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::RolePermission;

    fn account_id(s: &str) -> AccountId {
        s.parse().unwrap()
    }

    fn asset_id(s: &str) -> AssetId {
        s.parse().unwrap()
    }

    fn role_id(s: &str) -> RoleId {
        s.parse().unwrap()
    }

    fn seeded() -> WorldState {
        let mut ws = WorldState::new();
        ws.create_role(role_id("user"), RolePermissionSet::empty())
            .unwrap();
        ws.create_domain("domain".into(), role_id("user")).unwrap();
        ws.create_account(account_id("id@domain"), [1u8; 32])
            .unwrap();
        ws
    }

    // ========== Test Group 1: Rows and Roles ==========

    #[test]
    fn test_created_account_has_domain_default_role() {
        let ws = seeded();
        let roles = ws.account_roles(&account_id("id@domain")).unwrap();
        assert_eq!(roles, vec![role_id("user")]);
        let account = ws.account(&account_id("id@domain")).unwrap();
        assert_eq!(account.domain_id, "domain");
        assert_eq!(account.quorum, 1);
    }

    #[test]
    fn test_account_requires_domain() {
        let mut ws = WorldState::new();
        let err = ws
            .create_account(account_id("id@nowhere"), [1u8; 32])
            .unwrap_err();
        assert_eq!(err, WorldStateError::NoDomain("nowhere".into()));
    }

    #[test]
    fn test_roles_keep_insertion_order() {
        let mut ws = seeded();
        ws.create_role(role_id("admin"), RolePermissionSet::empty())
            .unwrap();
        ws.create_role(role_id("auditor"), RolePermissionSet::empty())
            .unwrap();
        assert_eq!(
            ws.roles(),
            vec![role_id("user"), role_id("admin"), role_id("auditor")]
        );
    }

    #[test]
    fn test_role_permissions_lookup() {
        let mut ws = seeded();
        let perms: RolePermissionSet = [RolePermission::GetBlocks].into_iter().collect();
        ws.create_role(role_id("watcher"), perms).unwrap();
        assert_eq!(ws.role_permissions(&role_id("watcher")).unwrap(), perms);
        assert!(matches!(
            ws.role_permissions(&role_id("ghost")),
            Err(WorldStateError::NoRole(_))
        ));
    }

    #[test]
    fn test_signatories_missing_and_empty_look_the_same() {
        let ws = seeded();
        assert!(ws.signatories(&account_id("id@domain")).is_ok());
        assert!(matches!(
            ws.signatories(&account_id("ghost@domain")),
            Err(WorldStateError::NoSignatories(_))
        ));
    }

    // ========== Test Group 2: Asset Pages ==========

    fn with_assets(count: u8) -> WorldState {
        let mut ws = seeded();
        for i in 0..count {
            let id = asset_id(&format!("coin{i}#domain"));
            ws.create_asset(id.clone(), 1).unwrap();
            ws.add_asset_quantity(&account_id("id@domain"), &id, Amount(100 + u128::from(i)))
                .unwrap();
        }
        ws
    }

    #[test]
    fn test_account_assets_first_page() {
        let ws = with_assets(5);
        let page = ws
            .account_assets(&account_id("id@domain"), 2, None)
            .unwrap();
        assert_eq!(page.assets.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.next_asset_id, Some(asset_id("coin2#domain")));
        assert_eq!(page.assets[0].asset_id, asset_id("coin0#domain"));
        // Minor units against the asset's precision of 1.
        assert_eq!(page.assets[0].balance, Amount(100));
        assert_eq!(page.assets[0].balance_decimal, "10.0");
        assert_eq!(page.assets[1].balance_decimal, "10.1");
    }

    #[test]
    fn test_account_assets_resume_and_exhaust() {
        let ws = with_assets(3);
        let first = asset_id("coin1#domain");
        let page = ws
            .account_assets(&account_id("id@domain"), 10, Some(&first))
            .unwrap();
        assert_eq!(page.assets.len(), 2);
        assert_eq!(page.next_asset_id, None);
    }

    #[test]
    fn test_account_assets_unknown_marker() {
        let ws = with_assets(2);
        let unknown = asset_id("doge#domain");
        let err = ws
            .account_assets(&account_id("id@domain"), 2, Some(&unknown))
            .unwrap_err();
        assert!(matches!(err, WorldStateError::InvalidPagination(_)));
    }

    #[test]
    fn test_account_assets_zero_page_size() {
        let ws = with_assets(1);
        assert!(matches!(
            ws.account_assets(&account_id("id@domain"), 0, None),
            Err(WorldStateError::InvalidPagination(_))
        ));
    }

    // ========== Test Group 3: Detail Records ==========

    fn with_details() -> WorldState {
        let mut ws = seeded();
        ws.create_account(account_id("id2@domain"), [2u8; 32])
            .unwrap();
        let target = account_id("id@domain");
        ws.set_account_detail(&target, account_id("id@domain"), "age".into(), "24".into())
            .unwrap();
        ws.set_account_detail(&target, account_id("id@domain"), "name".into(), "alice".into())
            .unwrap();
        ws.set_account_detail(&target, account_id("id2@domain"), "age".into(), "25".into())
            .unwrap();
        ws
    }

    #[test]
    fn test_detail_filter_by_writer_and_key() {
        let ws = with_details();
        let target = account_id("id@domain");
        let writer = account_id("id2@domain");
        let page = ws
            .account_detail(&target, Some(&writer), Some("age"), None)
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.detail["id2@domain"]["age"], "25");
    }

    #[test]
    fn test_detail_absent_subtree_is_an_error() {
        let ws = with_details();
        let target = account_id("id@domain");
        let err = ws
            .account_detail(&target, None, Some("height"), None)
            .unwrap_err();
        assert!(matches!(err, WorldStateError::NoAccountDetail(_)));
    }

    #[test]
    fn test_detail_pagination_walk() {
        let ws = with_details();
        let target = account_id("id@domain");
        let paging = DetailPaging {
            page_size: 2,
            first: None,
        };
        let page = ws
            .account_detail(&target, None, None, Some(&paging))
            .unwrap();
        assert_eq!(page.total, 3);
        let next = page.next_record.clone().unwrap();
        assert_eq!(next.writer, account_id("id2@domain"));
        assert_eq!(next.key, "age");

        let paging = DetailPaging {
            page_size: 2,
            first: Some(next),
        };
        let tail = ws
            .account_detail(&target, None, None, Some(&paging))
            .unwrap();
        assert_eq!(tail.next_record, None);
        assert_eq!(tail.detail["id2@domain"]["age"], "25");
    }

    #[test]
    fn test_detail_unknown_first_record() {
        let ws = with_details();
        let target = account_id("id@domain");
        let paging = DetailPaging {
            page_size: 2,
            first: Some(DetailRecordId {
                writer: account_id("ghost@domain"),
                key: "age".into(),
            }),
        };
        assert!(matches!(
            ws.account_detail(&target, None, None, Some(&paging)),
            Err(WorldStateError::InvalidPagination(_))
        ));
    }

    // ========== Test Group 4: Grants ==========

    #[test]
    fn test_grantable_permission_edge() {
        let mut ws = with_details();
        let grantor = account_id("id@domain");
        let grantee = account_id("id2@domain");
        assert!(!ws.has_grantable(&grantor, &grantee, GrantablePermission::GetMyAccAst));

        ws.grant_permission(&grantor, &grantee, GrantablePermission::GetMyAccAst)
            .unwrap();
        assert!(ws.has_grantable(&grantor, &grantee, GrantablePermission::GetMyAccAst));
        // Direction matters.
        assert!(!ws.has_grantable(&grantee, &grantor, GrantablePermission::GetMyAccAst));
    }
}
