use serde::{Deserialize, Serialize};

use super::defaults;

/// PROV-JSON export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Prefix used for non-PROV attributes (`lineage:hash`, ...).
    pub namespace: String,
    /// URI bound to `namespace` in the document's `prefix` section.
    pub namespace_uri: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            namespace: defaults::DEFAULT_EXPORT_NAMESPACE.to_string(),
            namespace_uri: defaults::DEFAULT_EXPORT_NAMESPACE_URI.to_string(),
        }
    }
}
