//! Schema manager: ordered, idempotent migrations recorded in `schema_version`.

mod v001_initial_schema;

use rusqlite::{params, Connection, OptionalExtension};

use lineage_core::constants::SCHEMA_VERSION;
use lineage_core::errors::{LineageError, LineageResult, StorageError};

use crate::connection::in_transaction;
use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> LineageResult<()>;

const MIGRATIONS: [(u32, &str, MigrationFn); 1] =
    [(1, "initial_schema", v001_initial_schema::migrate)];

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = SCHEMA_VERSION;

/// Bring the schema up to [`LATEST_VERSION`]. Safe to call on every open.
/// Returns the resulting schema version.
pub fn run_migrations(conn: &Connection) -> LineageResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| migration_failed(0, e.to_string()))?;

    let current = current_version(conn)?;
    for (version, name, migrate) in MIGRATIONS {
        if version <= current {
            continue;
        }
        tracing::info!(version, name, "applying lineage schema migration");
        in_transaction(conn, "migration", |tx| {
            migrate(tx).map_err(|e| migration_failed(version, e.to_string()))?;
            tx.execute(
                "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
                params![version],
            )
            .map_err(|e| migration_failed(version, e.to_string()))?;
            Ok(())
        })?;
    }
    current_version(conn)
}

/// Highest applied schema version, 0 on a fresh database.
pub fn current_version(conn: &Connection) -> LineageResult<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .flatten();
    Ok(version.unwrap_or(0))
}

fn migration_failed(version: u32, reason: String) -> LineageError {
    LineageError::StorageError(StorageError::MigrationFailed { version, reason })
}
