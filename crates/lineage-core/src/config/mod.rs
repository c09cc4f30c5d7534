//! Configuration for every subsystem, loadable from TOML.
//!
//! Every section is optional; missing keys fall back to [`defaults`].

pub mod defaults;
mod export_config;
mod observability_config;
mod storage_config;
mod traversal_config;
mod verification_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use export_config::ExportConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;
pub use traversal_config::TraversalConfig;
pub use verification_config::VerificationConfig;

use crate::errors::{LineageError, LineageResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub storage: StorageConfig,
    pub traversal: TraversalConfig,
    pub verification: VerificationConfig,
    pub export: ExportConfig,
    pub observability: ObservabilityConfig,
}

impl LineageConfig {
    /// Parse a TOML document. An empty document yields all defaults.
    pub fn from_toml(source: &str) -> LineageResult<Self> {
        toml::from_str(source).map_err(|e| LineageError::ConfigError(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> LineageResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            LineageError::ConfigError(format!("read {}: {e}", path.display()))
        })?;
        Self::from_toml(&source)
    }

    pub fn to_toml(&self) -> LineageResult<String> {
        toml::to_string(self).map_err(|e| LineageError::ConfigError(e.to_string()))
    }
}
