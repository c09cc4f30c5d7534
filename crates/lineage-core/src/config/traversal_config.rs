use serde::{Deserialize, Serialize};

use super::defaults;

/// Graph traversal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Depth bound applied when a caller does not pass one. `None` walks the whole graph.
    pub default_max_depth: Option<usize>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_max_depth: defaults::DEFAULT_MAX_DEPTH,
        }
    }
}
