//! Adapters layer: concrete chain-log backings.

pub mod memory;

pub use memory::{ChainView, InMemoryBlockStore};
