//! Adapters layer: concrete pool backings.

pub mod shared;

pub use shared::SharedPendingPool;
