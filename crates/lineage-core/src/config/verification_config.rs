use serde::{Deserialize, Serialize};

use super::defaults;

/// Integrity verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Buffer size used when streaming a file through the hasher.
    pub read_buffer_size: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: defaults::DEFAULT_READ_BUFFER_SIZE,
        }
    }
}
