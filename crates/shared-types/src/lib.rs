//! # Shared Types Crate
//!
//! Cross-crate vocabulary of the ledger: identifiers, world-state rows,
//! chain structures, and permission bitmaps.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary
//!   is defined here.
//! - **Canonical identity**: identifiers serialize as `name@domain` /
//!   `name#domain` strings; transaction identity is a SHA-256 payload
//!   digest, stable under re-signing.
//! - **Well-formed by construction**: identifier constructors enforce the
//!   grammar, so stores and handlers only ever see valid ids.

pub mod entities;
pub mod identifiers;
pub mod permissions;

pub use entities::*;
pub use identifiers::{
    is_valid_domain, is_valid_name, AccountId, AssetId, DomainId, IdParseError, RoleId,
    MAX_DOMAIN_LENGTH, MAX_NAME_LENGTH,
};
pub use permissions::{GrantablePermission, RolePermission, RolePermissionSet};
