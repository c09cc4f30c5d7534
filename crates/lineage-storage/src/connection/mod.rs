//! The store's single connection: opened on first use, serialized behind a
//! mutex, released on close.

pub mod pragmas;

use std::path::PathBuf;
use std::sync::Mutex;

use rusqlite::Connection;

use lineage_core::config::StorageConfig;
use lineage_core::errors::{LineageError, LineageResult};

use crate::migrations;
use crate::to_storage_err;

/// Lazily opened, mutex-guarded SQLite connection.
pub struct ConnectionHandle {
    config: StorageConfig,
    conn: Mutex<Option<Connection>>,
}

impl ConnectionHandle {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            conn: Mutex::new(None),
        }
    }

    /// Database location, `None` for in-memory stores.
    pub fn db_path(&self) -> Option<PathBuf> {
        (!self.config.is_in_memory()).then(|| PathBuf::from(&self.config.db_path))
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Run `f` with the connection, opening and migrating it first if needed.
    pub fn with_conn<F, T>(&self, f: F) -> LineageResult<T>
    where
        F: FnOnce(&Connection) -> LineageResult<T>,
    {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| LineageError::ConcurrencyError(format!("connection lock poisoned: {e}")))?;
        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        let conn = guard
            .as_ref()
            .ok_or_else(|| to_storage_err("connection unavailable".to_string()))?;
        f(conn)
    }

    /// Drop the connection. The next call to [`with_conn`](Self::with_conn) reopens it;
    /// for in-memory stores that means a fresh, empty database.
    pub fn close(&self) -> LineageResult<()> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| LineageError::ConcurrencyError(format!("connection lock poisoned: {e}")))?;
        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| to_storage_err(format!("close: {e}")))?;
            tracing::debug!(db_path = %self.config.db_path, "lineage store closed");
        }
        Ok(())
    }

    fn open(&self) -> LineageResult<Connection> {
        let conn = if self.config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&self.config.db_path)
        }
        .map_err(|e| to_storage_err(format!("open {}: {e}", self.config.db_path)))?;

        pragmas::apply_pragmas(&conn, &self.config)?;
        let version = migrations::run_migrations(&conn)?;
        tracing::info!(db_path = %self.config.db_path, schema_version = version, "lineage store opened");
        Ok(conn)
    }
}

/// Run `f` inside a transaction: commit on success, roll back on any error.
pub fn in_transaction<F, T>(conn: &Connection, label: &str, f: F) -> LineageResult<T>
where
    F: FnOnce(&Connection) -> LineageResult<T>,
{
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("{label} begin: {e}")))?;

    match f(&tx) {
        Ok(value) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("{label} commit: {e}")))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(label, error = %rollback_err, "rollback failed");
            }
            Err(e)
        }
    }
}
