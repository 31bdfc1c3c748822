//! # Permission Requirement Table
//!
//! Maps every query form to the minimum permission predicate it needs.
//! The authorizer consumes this table; adding a query kind means adding a
//! row here, not branching code elsewhere.

use shared_types::{AccountId, GrantablePermission, RolePermission};

use super::query::QueryPayload;

/// The self / same-domain / any triple of a scoped query, plus the
/// grantable delegation kind when the query accepts one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopedPermissions {
    pub self_p: RolePermission,
    pub domain_p: RolePermission,
    pub all_p: RolePermission,
    pub grantable: Option<GrantablePermission>,
}

/// What a query needs before its handler may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement<'a> {
    /// Tri-scope check against the target account.
    Scoped {
        target: &'a AccountId,
        permissions: ScopedPermissions,
    },
    /// One unscoped permission bit.
    Plain(RolePermission),
    /// Always about the caller's own account; no permission required.
    CreatorOnly,
    /// Permission depends on what each requested hash resolves to; the
    /// handler decides per transaction.
    PerTransaction,
}

/// The requirement row for a query payload.
pub fn requirement_for(payload: &QueryPayload) -> Requirement<'_> {
    match payload {
        QueryPayload::GetAccount { account_id } => Requirement::Scoped {
            target: account_id,
            permissions: ScopedPermissions {
                self_p: RolePermission::GetMyAccount,
                domain_p: RolePermission::GetDomainAccounts,
                all_p: RolePermission::GetAllAccounts,
                grantable: None,
            },
        },
        QueryPayload::GetSignatories { account_id } => Requirement::Scoped {
            target: account_id,
            permissions: ScopedPermissions {
                self_p: RolePermission::GetMySignatories,
                domain_p: RolePermission::GetDomainSignatories,
                all_p: RolePermission::GetAllSignatories,
                grantable: Some(GrantablePermission::GetMySignatories),
            },
        },
        QueryPayload::GetAccountTransactions { account_id, .. } => Requirement::Scoped {
            target: account_id,
            permissions: ScopedPermissions {
                self_p: RolePermission::GetMyAccTxs,
                domain_p: RolePermission::GetDomainAccTxs,
                all_p: RolePermission::GetAllAccTxs,
                grantable: None,
            },
        },
        QueryPayload::GetAccountAssetTransactions { account_id, .. } => Requirement::Scoped {
            target: account_id,
            permissions: ScopedPermissions {
                self_p: RolePermission::GetMyAccAstTxs,
                domain_p: RolePermission::GetDomainAccAstTxs,
                all_p: RolePermission::GetAllAccAstTxs,
                grantable: Some(GrantablePermission::GetMyAccAstTxs),
            },
        },
        QueryPayload::GetAccountAssets { account_id, .. } => Requirement::Scoped {
            target: account_id,
            permissions: ScopedPermissions {
                self_p: RolePermission::GetMyAccAst,
                domain_p: RolePermission::GetDomainAccAst,
                all_p: RolePermission::GetAllAccAst,
                grantable: Some(GrantablePermission::GetMyAccAst),
            },
        },
        QueryPayload::GetAccountDetail { account_id, .. } => Requirement::Scoped {
            target: account_id,
            permissions: ScopedPermissions {
                self_p: RolePermission::GetMyAccDetail,
                domain_p: RolePermission::GetDomainAccDetail,
                all_p: RolePermission::GetAllAccDetail,
                grantable: Some(GrantablePermission::GetMyAccDetail),
            },
        },
        QueryPayload::GetTransactions { .. } => Requirement::PerTransaction,
        QueryPayload::GetRoles => Requirement::Plain(RolePermission::GetRoles),
        QueryPayload::GetRolePermissions { .. } => Requirement::Plain(RolePermission::GetRoles),
        QueryPayload::GetAssetInfo { .. } => Requirement::Plain(RolePermission::ReadAssets),
        QueryPayload::GetPendingTransactions { .. } => Requirement::CreatorOnly,
        QueryPayload::GetBlock { .. } => Requirement::Plain(RolePermission::GetBlocks),
        QueryPayload::GetPeers => Requirement::Plain(RolePermission::GetPeers),
    }
}
