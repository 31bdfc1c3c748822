//! # Role and Grantable Permissions
//!
//! Role permissions are bits in a fixed-width bitmap, unioned across all
//! roles an account holds. `Root` is one bit and satisfies every check.
//!
//! Grantable permissions are per-pair delegations `(grantor, grantee,
//! kind)` stored in the world state; they widen the grantee's reach into
//! the grantor's account independently of role scopes.

use serde::{Deserialize, Serialize};

/// A single role permission bit.
///
/// Scoped readers come in self / same-domain / any triples; the remaining
/// variants are unscoped singletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RolePermission {
    GetMyAccount = 0,
    GetDomainAccounts = 1,
    GetAllAccounts = 2,
    GetMySignatories = 3,
    GetDomainSignatories = 4,
    GetAllSignatories = 5,
    GetMyAccTxs = 6,
    GetDomainAccTxs = 7,
    GetAllAccTxs = 8,
    GetMyAccAstTxs = 9,
    GetDomainAccAstTxs = 10,
    GetAllAccAstTxs = 11,
    GetMyAccAst = 12,
    GetDomainAccAst = 13,
    GetAllAccAst = 14,
    GetMyAccDetail = 15,
    GetDomainAccDetail = 16,
    GetAllAccDetail = 17,
    GetMyTxs = 18,
    GetAllTxs = 19,
    GetBlocks = 20,
    GetRoles = 21,
    ReadAssets = 22,
    GetPeers = 23,
    Root = 24,
}

impl RolePermission {
    /// All permission bits, in bit order.
    pub const ALL: [RolePermission; 25] = [
        RolePermission::GetMyAccount,
        RolePermission::GetDomainAccounts,
        RolePermission::GetAllAccounts,
        RolePermission::GetMySignatories,
        RolePermission::GetDomainSignatories,
        RolePermission::GetAllSignatories,
        RolePermission::GetMyAccTxs,
        RolePermission::GetDomainAccTxs,
        RolePermission::GetAllAccTxs,
        RolePermission::GetMyAccAstTxs,
        RolePermission::GetDomainAccAstTxs,
        RolePermission::GetAllAccAstTxs,
        RolePermission::GetMyAccAst,
        RolePermission::GetDomainAccAst,
        RolePermission::GetAllAccAst,
        RolePermission::GetMyAccDetail,
        RolePermission::GetDomainAccDetail,
        RolePermission::GetAllAccDetail,
        RolePermission::GetMyTxs,
        RolePermission::GetAllTxs,
        RolePermission::GetBlocks,
        RolePermission::GetRoles,
        RolePermission::ReadAssets,
        RolePermission::GetPeers,
        RolePermission::Root,
    ];

    /// The bitmap bit for this permission.
    pub const fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

/// A per-pair delegation kind granted from one account to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantablePermission {
    AddMySignatory,
    RemoveMySignatory,
    SetMyQuorum,
    SetMyAccountDetail,
    TransferMyAssets,
    GetMyAccAst,
    GetMySignatories,
    GetMyAccDetail,
    GetMyAccAstTxs,
}

/// A fixed-width bitmap of role permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RolePermissionSet(u64);

impl RolePermissionSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set membership.
    pub const fn has(self, p: RolePermission) -> bool {
        self.0 & p.bit() != 0
    }

    /// Adds a permission bit.
    pub fn set(&mut self, p: RolePermission) {
        self.0 |= p.bit();
    }

    /// Removes a permission bit.
    pub fn unset(&mut self, p: RolePermission) {
        self.0 &= !p.bit();
    }

    /// Sets every known permission bit.
    pub fn set_all(&mut self) {
        for p in RolePermission::ALL {
            self.set(p);
        }
    }

    /// Clears the whole set.
    pub fn unset_all(&mut self) {
        self.0 = 0;
    }

    /// Union of two sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True iff no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the permissions present in the set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = RolePermission> {
        RolePermission::ALL.into_iter().filter(move |p| self.has(*p))
    }
}

impl FromIterator<RolePermission> for RolePermissionSet {
    fn from_iter<I: IntoIterator<Item = RolePermission>>(iter: I) -> Self {
        let mut set = Self::empty();
        for p in iter {
            set.set(p);
        }
        set
    }
}
