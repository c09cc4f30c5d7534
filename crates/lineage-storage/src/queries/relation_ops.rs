//! Relation store: append-only, deduplicated on `(type, source, target)`.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};

use lineage_core::errors::LineageResult;
use lineage_core::models::{Relation, RelationFilter};

use crate::codec::{decode_metadata, encode_metadata};
use crate::{map_sqlite_err, to_storage_err};

/// Insert a relation unless its triple already exists. Returns whether a row
/// was written; metadata of an existing relation is not touched.
pub fn add_relation(conn: &Connection, relation: &Relation) -> LineageResult<bool> {
    let rows = conn
        .execute(
            "INSERT OR IGNORE INTO relations (relation_type, source_id, target_id, metadata)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                relation.relation_type.as_str(),
                relation.source_id,
                relation.target_id,
                encode_metadata(&relation.metadata)?,
            ],
        )
        .map_err(map_sqlite_err)?;
    Ok(rows > 0)
}

/// Relations matching every set field of `filter`, in insertion order.
pub fn get_relations(conn: &Connection, filter: &RelationFilter) -> LineageResult<Vec<Relation>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(relation_type) = &filter.relation_type {
        values.push(Box::new(relation_type.as_str().to_string()));
        clauses.push("relation_type = ?");
    }
    if let Some(source_id) = &filter.source_id {
        values.push(Box::new(source_id.clone()));
        clauses.push("source_id = ?");
    }
    if let Some(target_id) = &filter.target_id {
        values.push(Box::new(target_id.clone()));
        clauses.push("target_id = ?");
    }

    let mut sql =
        String::from("SELECT relation_type, source_id, target_id, metadata FROM relations");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY relation_id ASC");

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), |row| Ok(row_to_relation(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

fn row_to_relation(row: &Row<'_>) -> LineageResult<Relation> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let relation_type: String = row.get(0).map_err(get_err)?;
    let metadata: String = row.get(3).map_err(get_err)?;

    Ok(Relation {
        relation_type: relation_type.into(),
        source_id: row.get(1).map_err(get_err)?,
        target_id: row.get(2).map_err(get_err)?,
        metadata: decode_metadata(&metadata)?,
    })
}
