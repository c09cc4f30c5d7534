//! Entity store: insert, get, lookup by hash, list, partial update, delete.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use lineage_core::errors::{LineageError, LineageResult, NodeKind};
use lineage_core::ids::new_entity_id;
use lineage_core::models::{Entity, EntityFilter, EntityUpdate, NewEntity, Relation};

use crate::codec::{decode_metadata, decode_time, encode_metadata, encode_time, now};
use crate::connection::in_transaction;
use crate::queries::{activity_ops, relation_ops};
use crate::{map_sqlite_err, to_storage_err};

const ENTITY_COLUMNS: &str = "entity_id, entity_type, name, hash, path, size_bytes, metadata,
                              generated_by, generated_at";

/// Insert an entity and return its new id.
///
/// When `generated_by` is set the producing activity must exist; the entity is
/// then also recorded in that activity's generated set with a `wasGeneratedBy`
/// relation, all in one transaction.
pub fn create_entity(conn: &Connection, entity: &NewEntity) -> LineageResult<String> {
    in_transaction(conn, "create_entity", |tx| {
        let entity_id = new_entity_id();
        if let Some(activity_id) = &entity.generated_by {
            if !activity_ops::activity_exists(tx, activity_id)? {
                return Err(LineageError::not_found(NodeKind::Activity, activity_id.clone()));
            }
        }

        tx.execute(
            "INSERT INTO entities (
                entity_id, entity_type, name, hash, path, size_bytes, metadata,
                generated_by, generated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entity_id,
                entity.entity_type.as_str(),
                entity.name,
                entity.hash,
                entity.path,
                entity.size_bytes.map(|s| s as i64),
                encode_metadata(&entity.metadata)?,
                entity.generated_by,
                encode_time(&now()),
            ],
        )
        .map_err(map_sqlite_err)?;

        if let Some(activity_id) = &entity.generated_by {
            activity_ops::insert_generated_link(tx, activity_id, &entity_id)?;
            relation_ops::add_relation(tx, &Relation::was_generated_by(&entity_id, activity_id))?;
        }

        tracing::debug!(entity_id = %entity_id, entity_type = %entity.entity_type, "entity created");
        Ok(entity_id)
    })
}

/// Get a single entity by id.
pub fn get_entity(conn: &Connection, entity_id: &str) -> LineageResult<Option<Entity>> {
    let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE entity_id = ?1");
    query_one(conn, &sql, entity_id)
}

/// First entity with the given content hash. Among duplicates the winner is
/// whatever row SQLite returns first.
pub fn get_entity_by_hash(conn: &Connection, hash: &str) -> LineageResult<Option<Entity>> {
    let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE hash = ?1 LIMIT 1");
    query_one(conn, &sql, hash)
}

/// List entities newest-first, optionally filtered by type and producer.
pub fn list_entities(
    conn: &Connection,
    filter: &EntityFilter,
    limit: Option<usize>,
) -> LineageResult<Vec<Entity>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(entity_type) = &filter.entity_type {
        values.push(Box::new(entity_type.as_str().to_string()));
        clauses.push("entity_type = ?");
    }
    if let Some(generated_by) = &filter.generated_by {
        values.push(Box::new(generated_by.clone()));
        clauses.push("generated_by = ?");
    }

    let mut sql = format!("SELECT {ENTITY_COLUMNS} FROM entities");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY generated_at DESC, rowid DESC");
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), |row| Ok(row_to_entity(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// Apply a partial update. Returns `false` if the entity does not exist.
pub fn update_entity(
    conn: &Connection,
    entity_id: &str,
    update: &EntityUpdate,
) -> LineageResult<bool> {
    if update.is_empty() {
        return entity_exists(conn, entity_id);
    }

    let mut sets: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(entity_type) = &update.entity_type {
        values.push(Box::new(entity_type.as_str().to_string()));
        sets.push(format!("entity_type = ?{}", values.len()));
    }
    if let Some(name) = &update.name {
        values.push(Box::new(name.clone()));
        sets.push(format!("name = ?{}", values.len()));
    }
    if let Some(hash) = &update.hash {
        values.push(Box::new(hash.clone()));
        sets.push(format!("hash = ?{}", values.len()));
    }
    if let Some(path) = &update.path {
        values.push(Box::new(path.clone()));
        sets.push(format!("path = ?{}", values.len()));
    }
    if let Some(size_bytes) = update.size_bytes {
        values.push(Box::new(size_bytes as i64));
        sets.push(format!("size_bytes = ?{}", values.len()));
    }
    if let Some(metadata) = &update.metadata {
        values.push(Box::new(encode_metadata(metadata)?));
        sets.push(format!("metadata = ?{}", values.len()));
    }

    values.push(Box::new(entity_id.to_string()));
    let sql = format!(
        "UPDATE entities SET {} WHERE entity_id = ?{}",
        sets.join(", "),
        values.len()
    );

    in_transaction(conn, "update_entity", |tx| {
        let params_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let rows = tx
            .execute(&sql, params_refs.as_slice())
            .map_err(map_sqlite_err)?;
        Ok(rows > 0)
    })
}

/// Delete an entity. Relations that mention it are provenance history and stay.
pub fn delete_entity(conn: &Connection, entity_id: &str) -> LineageResult<bool> {
    in_transaction(conn, "delete_entity", |tx| {
        let rows = tx
            .execute("DELETE FROM entities WHERE entity_id = ?1", params![entity_id])
            .map_err(map_sqlite_err)?;
        Ok(rows > 0)
    })
}

pub fn entity_exists(conn: &Connection, entity_id: &str) -> LineageResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM entities WHERE entity_id = ?1)",
        params![entity_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Set `generated_by` only if it is currently unset. Returns whether a row changed.
pub(crate) fn backfill_generated_by(
    conn: &Connection,
    entity_id: &str,
    activity_id: &str,
) -> LineageResult<bool> {
    let rows = conn
        .execute(
            "UPDATE entities SET generated_by = ?2
             WHERE entity_id = ?1 AND generated_by IS NULL",
            params![entity_id, activity_id],
        )
        .map_err(map_sqlite_err)?;
    Ok(rows > 0)
}

fn query_one(conn: &Connection, sql: &str, key: &str) -> LineageResult<Option<Entity>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![key], |row| Ok(row_to_entity(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

fn row_to_entity(row: &Row<'_>) -> LineageResult<Entity> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let entity_type: String = row.get(1).map_err(get_err)?;
    let size_bytes: Option<i64> = row.get(5).map_err(get_err)?;
    let metadata: String = row.get(6).map_err(get_err)?;
    let generated_at: String = row.get(8).map_err(get_err)?;

    Ok(Entity {
        entity_id: row.get(0).map_err(get_err)?,
        entity_type: entity_type.into(),
        name: row.get(2).map_err(get_err)?,
        hash: row.get(3).map_err(get_err)?,
        path: row.get(4).map_err(get_err)?,
        size_bytes: size_bytes.map(|s| s as u64),
        metadata: decode_metadata(&metadata)?,
        generated_by: row.get(7).map_err(get_err)?,
        generated_at: decode_time(&generated_at)?,
    })
}
