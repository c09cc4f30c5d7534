//! # lineage-storage
//!
//! SQLite-backed implementation of [`ILineageStorage`](lineage_core::ILineageStorage):
//! one lazily opened connection, idempotent migrations, and transactional
//! writes that keep activities and their provenance relations in step.

pub mod codec;
pub mod connection;
pub mod engine;
pub mod migrations;
pub mod queries;

pub use engine::StorageEngine;

use lineage_core::errors::{LineageError, StorageError};

/// Wrap a message as a generic SQLite storage failure.
pub(crate) fn to_storage_err(message: String) -> LineageError {
    LineageError::StorageError(StorageError::SqliteError { message })
}

/// Map a rusqlite error, surfacing constraint violations (unique, foreign key,
/// check) as [`LineageError::IntegrityViolation`].
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> LineageError {
    match &e {
        rusqlite::Error::SqliteFailure(err, msg)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            LineageError::integrity(msg.clone().unwrap_or_else(|| e.to_string()))
        }
        _ => to_storage_err(e.to_string()),
    }
}
