//! # Block Store
//!
//! Append-only log of committed blocks in height order, plus the
//! transaction indices the query engine paginates over.
//!
//! ## Invariants
//!
//! - Heights form the dense sequence `[1, H]`; `prev_hash` links are
//!   verified on append; height 1 links to the zero hash.
//! - Transaction hashes are globally unique across the chain.
//! - Per-account and per-`(account, asset)` index entries are kept in
//!   ascending `(height, index)` order, compared as integers.
//!
//! ## Layers
//!
//! - **Domain** (`domain/`): `ChainLog` and `TxLocation`
//! - **Ports** (`ports/`): `BlockQuery` / `BlockStoreReader` contracts
//! - **Adapters** (`adapters/`): the in-memory copy-on-write store

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{ChainView, InMemoryBlockStore};
pub use domain::{BlockStoreError, ChainLog, TxLocation};
pub use ports::{BlockQuery, BlockStoreReader};
