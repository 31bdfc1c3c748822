//! # Pending Pool
//!
//! In-memory queue of transactions submitted but not yet committed,
//! keyed by creator and paginated by hash.
//!
//! The pool is the only mutable resource the read path consults: reads
//! are real-time rather than snapshot-isolated, with consistency
//! guaranteed per call. The write path keeps the pool disjoint from the
//! committed chain via `remove_committed`.
//!
//! ## Layers
//!
//! - **Domain** (`domain/`): `PendingPool` and its pagination contract
//! - **Ports** (`ports/`): the `PendingPoolReader` contract
//! - **Adapters** (`adapters/`): the lock-guarded shared pool

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::SharedPendingPool;
pub use domain::{PendingPage, PendingPool, PendingPoolError};
pub use ports::PendingPoolReader;
