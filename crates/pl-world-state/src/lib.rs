//! # World-State Store
//!
//! The read side's window onto committed ledger state: accounts, domains,
//! roles, assets, balances, signatories, detail records, grantable
//! permissions, and peers.
//!
//! ## Snapshot model
//!
//! The store publishes an immutable `WorldState` value behind an `Arc`.
//! `open_view` pins the current value; `commit` builds a replacement on a
//! private clone and swaps it in atomically. Readers therefore always see
//! a single consistent committed height, and views opened later never see
//! an older height than views opened earlier.
//!
//! ## Layers
//!
//! - **Domain** (`domain/`): the tables and their read/commit semantics
//! - **Ports** (`ports/`): `WorldStateView` / `WorldStateStore` contracts
//! - **Adapters** (`adapters/`): the in-memory copy-on-write store

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryWorldState, WorldStateSnapshot};
pub use domain::{
    AccountAssetsPage, AccountDetailPage, DetailPaging, DetailRecordId, WorldState, WorldStateError,
};
pub use ports::{WorldStateStore, WorldStateView};
