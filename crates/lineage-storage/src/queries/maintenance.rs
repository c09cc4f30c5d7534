//! Database health checks.

use rusqlite::Connection;

use lineage_core::errors::{LineageError, LineageResult, StorageError};

use crate::to_storage_err;

/// Run `PRAGMA integrity_check` and `PRAGMA foreign_key_check`.
/// Any finding is reported as [`StorageError::CorruptionDetected`].
pub fn integrity_check(conn: &Connection) -> LineageResult<()> {
    let mut stmt = conn
        .prepare("PRAGMA integrity_check")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let findings: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<_, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if findings.len() != 1 || findings[0] != "ok" {
        return Err(corruption(findings.join("; ")));
    }

    let mut stmt = conn
        .prepare("PRAGMA foreign_key_check")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let dangling: Vec<String> = stmt
        .query_map([], |row| {
            let table: String = row.get(0)?;
            let parent: String = row.get(2)?;
            Ok(format!("{table} -> {parent}"))
        })
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<_, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if !dangling.is_empty() {
        return Err(corruption(format!(
            "dangling foreign keys: {}",
            dangling.join(", ")
        )));
    }
    Ok(())
}

fn corruption(details: String) -> LineageError {
    LineageError::StorageError(StorageError::CorruptionDetected { details })
}
