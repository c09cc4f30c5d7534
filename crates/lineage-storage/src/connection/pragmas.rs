//! PRAGMA configuration applied to every SQLite connection.
//!
//! foreign_keys ON is mandatory: the cascade, set-null, and restrict rules of
//! the schema depend on it.

use rusqlite::Connection;

use lineage_core::config::StorageConfig;
use lineage_core::errors::LineageResult;

use crate::to_storage_err;

/// Apply safety and performance pragmas to a connection.
pub fn apply_pragmas(conn: &Connection, config: &StorageConfig) -> LineageResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = {};
        PRAGMA cache_size = {};
        PRAGMA synchronous = NORMAL;
        ",
        config.busy_timeout_ms, config.cache_size,
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;

    if config.wal_mode && !config.is_in_memory() {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Verify that foreign key enforcement is active on a connection.
pub fn foreign_keys_enabled(conn: &Connection) -> LineageResult<bool> {
    let enabled: i64 = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(enabled == 1)
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> LineageResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
