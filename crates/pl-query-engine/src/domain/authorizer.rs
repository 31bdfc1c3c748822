//! # Query Authorizer
//!
//! Decides whether a creator may run a query, before any handler touches
//! the stores. `Root` permits everything; otherwise the requirement table
//! row is evaluated: self scope, same-domain scope, any scope, and the
//! grantable delegation where the query accepts one. Grantable checks are
//! independent of role scopes; either alone authorizes.
//!
//! Authorization runs before existence checks: a caller without
//! permission learns nothing about whether the target exists.

use shared_types::{AccountId, RolePermission, RolePermissionSet};

use pl_world_state::WorldStateView;

use super::errors::QueryError;
use super::query::QueryPayload;
use super::requirements::{requirement_for, Requirement};

/// Union of the permission sets of every role the account holds.
///
/// An account that references nothing holds no permissions.
pub fn permissions_of(view: &dyn WorldStateView, account: &AccountId) -> RolePermissionSet {
    let Ok(roles) = view.account_roles(account) else {
        return RolePermissionSet::empty();
    };
    roles
        .iter()
        .filter_map(|role| view.role_permissions(role).ok())
        .fold(RolePermissionSet::empty(), RolePermissionSet::union)
}

/// True iff any role of `account` carries `Root`.
pub fn has_root(view: &dyn WorldStateView, account: &AccountId) -> bool {
    permissions_of(view, account).has(RolePermission::Root)
}

/// The single authorization decision.
pub fn authorize(
    view: &dyn WorldStateView,
    creator: &AccountId,
    payload: &QueryPayload,
) -> Result<(), QueryError> {
    let held = permissions_of(view, creator);
    if held.has(RolePermission::Root) {
        return Ok(());
    }

    match requirement_for(payload) {
        Requirement::CreatorOnly => Ok(()),
        // Resolved inside the handler: permission depends on who created
        // each requested transaction.
        Requirement::PerTransaction => Ok(()),
        Requirement::Plain(permission) => {
            if held.has(permission) {
                Ok(())
            } else {
                Err(QueryError::NoPermissions)
            }
        }
        Requirement::Scoped {
            target,
            permissions,
        } => {
            let permitted = (target == creator && held.has(permissions.self_p))
                || (target.domain() == creator.domain() && held.has(permissions.domain_p))
                || held.has(permissions.all_p)
                || permissions
                    .grantable
                    .is_some_and(|kind| view.has_grantable(target, creator, kind));
            if permitted {
                Ok(())
            } else {
                Err(QueryError::NoPermissions)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_world_state::{InMemoryWorldState, WorldStateStore};
    use shared_types::GrantablePermission;

    fn account_id(s: &str) -> AccountId {
        s.parse().unwrap()
    }

    /// One role per account, named after the full account id.
    fn store_with(accounts: &[(&str, RolePermissionSet)]) -> InMemoryWorldState {
        let store = InMemoryWorldState::new();
        store
            .commit(|ws| {
                ws.create_role("default".parse().unwrap(), RolePermissionSet::empty())?;
                ws.create_domain("domain".into(), "default".parse().unwrap())?;
                ws.create_domain("andomain".into(), "default".parse().unwrap())?;
                for (id, perms) in accounts {
                    let id = account_id(id);
                    let role: shared_types::RoleId =
                        format!("{}_{}", id.name(), id.domain()).parse().unwrap();
                    ws.create_account(id.clone(), [1u8; 32])?;
                    ws.create_role(role.clone(), *perms)?;
                    ws.append_role(&id, role)?;
                }
                Ok(())
            })
            .unwrap();
        store
    }

    fn get_account(target: &str) -> QueryPayload {
        QueryPayload::GetAccount {
            account_id: account_id(target),
        }
    }

    // ========== Test Group 1: Scope Evaluation ==========

    #[test]
    fn test_self_scope_only_reaches_own_account() {
        let store = store_with(&[
            ("id@domain", [RolePermission::GetMyAccount].into_iter().collect()),
            ("id2@domain", RolePermissionSet::empty()),
        ]);
        let view = store.open_view();
        let creator = account_id("id@domain");

        assert!(authorize(view.as_ref(), &creator, &get_account("id@domain")).is_ok());
        assert_eq!(
            authorize(view.as_ref(), &creator, &get_account("id2@domain")),
            Err(QueryError::NoPermissions)
        );
    }

    #[test]
    fn test_domain_scope_stops_at_domain_boundary() {
        let store = store_with(&[
            ("id@domain", [RolePermission::GetDomainAccounts].into_iter().collect()),
            ("id2@domain", RolePermissionSet::empty()),
            ("id@andomain", RolePermissionSet::empty()),
        ]);
        let view = store.open_view();
        let creator = account_id("id@domain");

        assert!(authorize(view.as_ref(), &creator, &get_account("id2@domain")).is_ok());
        assert_eq!(
            authorize(view.as_ref(), &creator, &get_account("id@andomain")),
            Err(QueryError::NoPermissions)
        );
    }

    #[test]
    fn test_all_scope_crosses_domains() {
        let store = store_with(&[
            ("id@domain", [RolePermission::GetAllAccounts].into_iter().collect()),
            ("id@andomain", RolePermissionSet::empty()),
        ]);
        let view = store.open_view();
        let creator = account_id("id@domain");

        assert!(authorize(view.as_ref(), &creator, &get_account("id@andomain")).is_ok());
    }

    #[test]
    fn test_authorization_does_not_reveal_existence() {
        // No permission, target missing: still NoPermissions.
        let store = store_with(&[("id@domain", RolePermissionSet::empty())]);
        let view = store.open_view();
        assert_eq!(
            authorize(view.as_ref(), &account_id("id@domain"), &get_account("ghost@domain")),
            Err(QueryError::NoPermissions)
        );
    }

    // ========== Test Group 2: Root and Grants ==========

    #[test]
    fn test_root_permits_everything() {
        let store = store_with(&[
            ("id@domain", [RolePermission::Root].into_iter().collect()),
            ("id@andomain", RolePermissionSet::empty()),
        ]);
        let view = store.open_view();
        let creator = account_id("id@domain");

        for payload in [
            get_account("id@andomain"),
            QueryPayload::GetPeers,
            QueryPayload::GetRoles,
            QueryPayload::GetBlock { height: 1 },
        ] {
            assert!(authorize(view.as_ref(), &creator, &payload).is_ok(), "{payload:?}");
        }
        assert!(has_root(view.as_ref(), &creator));
    }

    #[test]
    fn test_grantable_delegation_authorizes_alone() {
        let store = store_with(&[
            ("id@domain", RolePermissionSet::empty()),
            ("id2@domain", RolePermissionSet::empty()),
        ]);
        store
            .commit(|ws| {
                ws.grant_permission(
                    &account_id("id2@domain"),
                    &account_id("id@domain"),
                    GrantablePermission::GetMySignatories,
                )
            })
            .unwrap();
        let view = store.open_view();
        let creator = account_id("id@domain");
        let payload = QueryPayload::GetSignatories {
            account_id: account_id("id2@domain"),
        };

        assert!(authorize(view.as_ref(), &creator, &payload).is_ok());

        // The grant is for signatories only; account reads stay denied.
        assert_eq!(
            authorize(view.as_ref(), &creator, &get_account("id2@domain")),
            Err(QueryError::NoPermissions)
        );
    }

    #[test]
    fn test_permissions_union_across_roles() {
        let store = store_with(&[("id@domain", [RolePermission::GetPeers].into_iter().collect())]);
        store
            .commit(|ws| {
                ws.create_role(
                    "extra".parse().unwrap(),
                    [RolePermission::GetBlocks].into_iter().collect(),
                )?;
                ws.append_role(&account_id("id@domain"), "extra".parse().unwrap())
            })
            .unwrap();
        let view = store.open_view();

        let held = permissions_of(view.as_ref(), &account_id("id@domain"));
        assert!(held.has(RolePermission::GetPeers));
        assert!(held.has(RolePermission::GetBlocks));
        assert!(!held.has(RolePermission::Root));
    }

    #[test]
    fn test_unknown_creator_holds_nothing() {
        let store = store_with(&[]);
        let view = store.open_view();
        assert!(permissions_of(view.as_ref(), &account_id("ghost@domain")).is_empty());
    }
}
