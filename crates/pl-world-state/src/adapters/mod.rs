//! Adapters layer: concrete world-state backings.

pub mod memory_db;

pub use memory_db::{InMemoryWorldState, WorldStateSnapshot};
