//! Error taxonomy for the lineage store.
//!
//! Verification findings (hash mismatch, missing file) are not errors; they are
//! reported as values by the verifier.

mod storage_error;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use storage_error::StorageError;

use crate::models::ActivityStatus;

/// Which kind of provenance node a lookup referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Entity,
    Activity,
    Agent,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Entity => "entity",
            Self::Activity => "activity",
            Self::Agent => "agent",
        };
        f.write_str(name)
    }
}

/// Top-level error type for every lineage operation.
#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: NodeKind, id: String },

    #[error("integrity violation: {reason}")]
    IntegrityViolation { reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid transition for activity {activity_id}: {from} -> {to}")]
    InvalidTransition {
        activity_id: String,
        from: ActivityStatus,
        to: ActivityStatus,
    },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),
}

impl LineageError {
    pub fn not_found(kind: NodeKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn integrity(reason: impl Into<String>) -> Self {
        Self::IntegrityViolation {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::IntegrityViolation { .. })
    }
}

pub type LineageResult<T> = Result<T, LineageError>;
