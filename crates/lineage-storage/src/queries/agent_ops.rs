//! Agent store. `(agent_type, name, version)` is unique; a `NULL` version is
//! an identity of its own.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use lineage_core::errors::LineageResult;
use lineage_core::ids::new_agent_id;
use lineage_core::models::{Agent, AgentFilter, NewAgent};

use crate::codec::{decode_metadata, decode_time, encode_metadata, encode_time, now};
use crate::connection::in_transaction;
use crate::{map_sqlite_err, to_storage_err};

const AGENT_COLUMNS: &str = "agent_id, agent_type, name, version, provider, metadata, created_at";

/// Insert a new agent. A duplicate identity is an integrity violation.
pub fn create_agent(conn: &Connection, agent: &NewAgent) -> LineageResult<String> {
    in_transaction(conn, "create_agent", |tx| insert_agent(tx, agent))
}

pub fn get_agent(conn: &Connection, agent_id: &str) -> LineageResult<Option<Agent>> {
    let sql = format!("SELECT {AGENT_COLUMNS} FROM agents WHERE agent_id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let result = stmt
        .query_row(params![agent_id], |row| Ok(row_to_agent(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Id of the agent with this identity, inserting it if absent.
/// Provider and metadata of an existing agent are left as they are.
pub fn get_or_create_agent(conn: &Connection, agent: &NewAgent) -> LineageResult<String> {
    in_transaction(conn, "get_or_create_agent", |tx| {
        if let Some(agent_id) = find_by_identity(tx, agent)? {
            return Ok(agent_id);
        }
        insert_agent(tx, agent)
    })
}

pub fn list_agents(
    conn: &Connection,
    filter: &AgentFilter,
    limit: Option<usize>,
) -> LineageResult<Vec<Agent>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(agent_type) = &filter.agent_type {
        values.push(Box::new(agent_type.as_str().to_string()));
        clauses.push("agent_type = ?");
    }
    if let Some(name) = &filter.name {
        values.push(Box::new(name.clone()));
        clauses.push("name = ?");
    }
    if let Some(provider) = &filter.provider {
        values.push(Box::new(provider.clone()));
        clauses.push("provider = ?");
    }

    let mut sql = format!("SELECT {AGENT_COLUMNS} FROM agents");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, rowid DESC");
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let params_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let rows = stmt
        .query_map(params_refs.as_slice(), |row| Ok(row_to_agent(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

/// Delete an agent. Fails with an integrity violation while activities still
/// reference it.
pub fn delete_agent(conn: &Connection, agent_id: &str) -> LineageResult<bool> {
    in_transaction(conn, "delete_agent", |tx| {
        let rows = tx
            .execute("DELETE FROM agents WHERE agent_id = ?1", params![agent_id])
            .map_err(map_sqlite_err)?;
        Ok(rows > 0)
    })
}

pub fn agent_exists(conn: &Connection, agent_id: &str) -> LineageResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM agents WHERE agent_id = ?1)",
        params![agent_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn insert_agent(conn: &Connection, agent: &NewAgent) -> LineageResult<String> {
    let agent_id = new_agent_id();
    conn.execute(
        "INSERT INTO agents (agent_id, agent_type, name, version, provider, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            agent_id,
            agent.agent_type.as_str(),
            agent.name,
            agent.version,
            agent.provider,
            encode_metadata(&agent.metadata)?,
            encode_time(&now()),
        ],
    )
    .map_err(map_sqlite_err)?;
    tracing::debug!(agent_id = %agent_id, agent_type = %agent.agent_type, name = %agent.name, "agent created");
    Ok(agent_id)
}

fn find_by_identity(conn: &Connection, agent: &NewAgent) -> LineageResult<Option<String>> {
    conn.query_row(
        "SELECT agent_id FROM agents
         WHERE agent_type = ?1 AND name = ?2 AND version IS ?3",
        params![agent.agent_type.as_str(), agent.name, agent.version],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_agent(row: &Row<'_>) -> LineageResult<Agent> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let agent_type: String = row.get(1).map_err(get_err)?;
    let metadata: String = row.get(5).map_err(get_err)?;
    let created_at: String = row.get(6).map_err(get_err)?;

    Ok(Agent {
        agent_id: row.get(0).map_err(get_err)?,
        agent_type: agent_type.into(),
        name: row.get(2).map_err(get_err)?,
        version: row.get(3).map_err(get_err)?,
        provider: row.get(4).map_err(get_err)?,
        metadata: decode_metadata(&metadata)?,
        created_at: decode_time(&created_at)?,
    })
}
