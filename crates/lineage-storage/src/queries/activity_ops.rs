//! Activity store. Every mutation writes the activity row, its junction rows,
//! and the mirroring provenance relations in one transaction.

use std::collections::HashSet;

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use lineage_core::errors::{LineageError, LineageResult, NodeKind};
use lineage_core::ids::new_activity_id;
use lineage_core::models::{Activity, ActivityFilter, ActivityStatus, NewActivity, Relation};

use crate::codec::{decode_metadata, decode_time, encode_metadata, encode_time, now};
use crate::connection::in_transaction;
use crate::queries::{agent_ops, entity_ops, relation_ops};
use crate::{map_sqlite_err, to_storage_err};

const ACTIVITY_COLUMNS: &str = "a.activity_id, a.activity_type, a.name, a.agent_id, a.run_id,
                                a.parameters, a.started_at, a.ended_at, a.status";

/// Insert a `running` activity and its derived relations:
/// `used(activity -> entity)` per consumed entity, `wasGeneratedBy(entity -> activity)`
/// per produced entity, and one `wasAssociatedWith(activity -> agent)`.
pub fn create_activity(conn: &Connection, activity: &NewActivity) -> LineageResult<String> {
    in_transaction(conn, "create_activity", |tx| {
        if !agent_ops::agent_exists(tx, &activity.agent_id)? {
            return Err(LineageError::not_found(
                NodeKind::Agent,
                activity.agent_id.clone(),
            ));
        }

        let activity_id = new_activity_id();
        tx.execute(
            "INSERT INTO activities (
                activity_id, activity_type, name, agent_id, run_id, parameters,
                started_at, ended_at, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8)",
            params![
                activity_id,
                activity.activity_type.as_str(),
                activity.name,
                activity.agent_id,
                activity.run_id,
                encode_metadata(&activity.parameters)?,
                encode_time(&now()),
                ActivityStatus::Running.as_str(),
            ],
        )
        .map_err(map_sqlite_err)?;

        for entity_id in unique(&activity.used_entities) {
            require_entity(tx, entity_id)?;
            insert_used_link(tx, &activity_id, entity_id)?;
            relation_ops::add_relation(tx, &Relation::used(&activity_id, entity_id))?;
        }
        for entity_id in unique(&activity.generated_entities) {
            attach_generated(tx, &activity_id, entity_id)?;
        }
        relation_ops::add_relation(
            tx,
            &Relation::was_associated_with(&activity_id, &activity.agent_id),
        )?;

        tracing::debug!(
            activity_id = %activity_id,
            agent_id = %activity.agent_id,
            used = activity.used_entities.len(),
            "activity started"
        );
        Ok(activity_id)
    })
}

/// Move a running activity to `status`, stamp `ended_at`, and attach any
/// entities discovered after the work finished.
///
/// Returns `false` (with no effects) if the activity does not exist.
/// An entity that already has a producer keeps it.
pub fn complete_activity(
    conn: &Connection,
    activity_id: &str,
    status: ActivityStatus,
    generated_entities: &[String],
) -> LineageResult<bool> {
    if !status.is_terminal() {
        return Err(LineageError::InvalidInput(format!(
            "activity {activity_id} cannot be completed with status {status}"
        )));
    }

    in_transaction(conn, "complete_activity", |tx| {
        let current = match current_status(tx, activity_id)? {
            Some(current) => current,
            None => return Ok(false),
        };
        if current.is_terminal() {
            return Err(LineageError::InvalidTransition {
                activity_id: activity_id.to_string(),
                from: current,
                to: status,
            });
        }

        tx.execute(
            "UPDATE activities SET status = ?2, ended_at = ?3 WHERE activity_id = ?1",
            params![activity_id, status.as_str(), encode_time(&now())],
        )
        .map_err(map_sqlite_err)?;

        for entity_id in unique(generated_entities) {
            attach_generated(tx, activity_id, entity_id)?;
        }

        tracing::debug!(activity_id = %activity_id, status = %status, "activity completed");
        Ok(true)
    })
}

/// Get an activity with its used/generated entity sets.
pub fn get_activity(conn: &Connection, activity_id: &str) -> LineageResult<Option<Activity>> {
    let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities a WHERE a.activity_id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![activity_id], |row| Ok(row_to_activity(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(activity) => {
            let mut activity = activity?;
            load_entity_sets(conn, &mut activity)?;
            Ok(Some(activity))
        }
        None => Ok(None),
    }
}

/// List activities newest-first, filtered by type, agent, and run id.
pub fn list_activities(
    conn: &Connection,
    filter: &ActivityFilter,
    limit: Option<usize>,
) -> LineageResult<Vec<Activity>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(activity_type) = &filter.activity_type {
        values.push(Box::new(activity_type.as_str().to_string()));
        clauses.push("a.activity_type = ?");
    }
    if let Some(agent_id) = &filter.agent_id {
        values.push(Box::new(agent_id.clone()));
        clauses.push("a.agent_id = ?");
    }
    if let Some(run_id) = &filter.run_id {
        values.push(Box::new(run_id.clone()));
        clauses.push("a.run_id = ?");
    }

    let mut sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities a");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY a.started_at DESC, a.rowid DESC");
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let params_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
    query_activities(conn, &sql, params_refs.as_slice())
}

/// Activities whose used set contains `entity_id`, oldest first.
pub fn activities_using_entity(conn: &Connection, entity_id: &str) -> LineageResult<Vec<Activity>> {
    let sql = format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities a
         JOIN activity_used_entities u ON u.activity_id = a.activity_id
         WHERE u.entity_id = ?1
         ORDER BY a.started_at ASC, a.rowid ASC"
    );
    query_activities(conn, &sql, &[&entity_id as &dyn ToSql])
}

/// Delete an activity. Junction rows cascade; produced entities keep existing
/// with `generated_by` cleared.
pub fn delete_activity(conn: &Connection, activity_id: &str) -> LineageResult<bool> {
    in_transaction(conn, "delete_activity", |tx| {
        let rows = tx
            .execute(
                "DELETE FROM activities WHERE activity_id = ?1",
                params![activity_id],
            )
            .map_err(map_sqlite_err)?;
        Ok(rows > 0)
    })
}

pub fn activity_exists(conn: &Connection, activity_id: &str) -> LineageResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM activities WHERE activity_id = ?1)",
        params![activity_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub(crate) fn insert_used_link(
    conn: &Connection,
    activity_id: &str,
    entity_id: &str,
) -> LineageResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO activity_used_entities (activity_id, entity_id) VALUES (?1, ?2)",
        params![activity_id, entity_id],
    )
    .map_err(map_sqlite_err)?;
    Ok(())
}

pub(crate) fn insert_generated_link(
    conn: &Connection,
    activity_id: &str,
    entity_id: &str,
) -> LineageResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO activity_generated_entities (activity_id, entity_id) VALUES (?1, ?2)",
        params![activity_id, entity_id],
    )
    .map_err(map_sqlite_err)?;
    Ok(())
}

/// Junction row + first-writer-wins `generated_by` + `wasGeneratedBy` relation.
fn attach_generated(conn: &Connection, activity_id: &str, entity_id: &str) -> LineageResult<()> {
    require_entity(conn, entity_id)?;
    insert_generated_link(conn, activity_id, entity_id)?;
    if !entity_ops::backfill_generated_by(conn, entity_id, activity_id)? {
        tracing::debug!(
            entity_id = %entity_id,
            activity_id = %activity_id,
            "entity already has a producer; generated_by left unchanged"
        );
    }
    relation_ops::add_relation(conn, &Relation::was_generated_by(entity_id, activity_id))?;
    Ok(())
}

fn require_entity(conn: &Connection, entity_id: &str) -> LineageResult<()> {
    if entity_ops::entity_exists(conn, entity_id)? {
        Ok(())
    } else {
        Err(LineageError::not_found(NodeKind::Entity, entity_id))
    }
}

fn current_status(conn: &Connection, activity_id: &str) -> LineageResult<Option<ActivityStatus>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT status FROM activities WHERE activity_id = ?1",
            params![activity_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(|s| s.parse()).transpose()
}

fn query_activities(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> LineageResult<Vec<Activity>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_activity(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let mut activity = row.map_err(|e| to_storage_err(e.to_string()))??;
        load_entity_sets(conn, &mut activity)?;
        results.push(activity);
    }
    Ok(results)
}

fn load_entity_sets(conn: &Connection, activity: &mut Activity) -> LineageResult<()> {
    activity.used_entities = linked_entities(
        conn,
        "SELECT entity_id FROM activity_used_entities WHERE activity_id = ?1 ORDER BY rowid",
        &activity.activity_id,
    )?;
    activity.generated_entities = linked_entities(
        conn,
        "SELECT entity_id FROM activity_generated_entities WHERE activity_id = ?1 ORDER BY rowid",
        &activity.activity_id,
    )?;
    Ok(())
}

fn linked_entities(conn: &Connection, sql: &str, activity_id: &str) -> LineageResult<Vec<String>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![activity_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_activity(row: &Row<'_>) -> LineageResult<Activity> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let activity_type: String = row.get(1).map_err(get_err)?;
    let parameters: String = row.get(5).map_err(get_err)?;
    let started_at: String = row.get(6).map_err(get_err)?;
    let ended_at: Option<String> = row.get(7).map_err(get_err)?;
    let status: String = row.get(8).map_err(get_err)?;

    Ok(Activity {
        activity_id: row.get(0).map_err(get_err)?,
        activity_type: activity_type.into(),
        name: row.get(2).map_err(get_err)?,
        agent_id: row.get(3).map_err(get_err)?,
        run_id: row.get(4).map_err(get_err)?,
        used_entities: Vec::new(),
        generated_entities: Vec::new(),
        parameters: decode_metadata(&parameters)?,
        started_at: decode_time(&started_at)?,
        ended_at: ended_at.as_deref().map(decode_time).transpose()?,
        status: status.parse()?,
    })
}

/// Ids in first-seen order without repeats.
fn unique(ids: &[String]) -> impl Iterator<Item = &String> {
    let mut seen = HashSet::new();
    ids.iter().filter(move |id| seen.insert(id.as_str()))
}
