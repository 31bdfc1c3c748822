//! Engine configuration.

use serde::{Deserialize, Serialize};

use super::query::QueryKind;

/// Policy knobs for the query engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Query kinds rejected with `NotSupported` before authorization.
    pub disabled_queries: Vec<QueryKind>,
}

impl EngineConfig {
    pub fn is_disabled(&self, kind: QueryKind) -> bool {
        self.disabled_queries.contains(&kind)
    }
}
