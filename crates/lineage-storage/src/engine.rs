//! StorageEngine: owns the connection handle and implements ILineageStorage.

use std::path::{Path, PathBuf};

use lineage_core::config::StorageConfig;
use lineage_core::errors::LineageResult;
use lineage_core::models::{
    Activity, ActivityFilter, ActivityStatus, Agent, AgentFilter, Entity, EntityFilter,
    EntityUpdate, LineageStats, NewActivity, NewAgent, NewEntity, Relation, RelationFilter,
};
use lineage_core::traits::ILineageStorage;

use crate::connection::{in_transaction, ConnectionHandle};
use crate::migrations;
use crate::queries::{activity_ops, agent_ops, aggregation, entity_ops, maintenance, relation_ops};

/// The SQLite lineage store. Cheap to construct: nothing touches disk until
/// the first operation.
pub struct StorageEngine {
    handle: ConnectionHandle,
}

impl StorageEngine {
    /// Store backed by a database file, created on first use.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::from_config(&StorageConfig {
            db_path: path.as_ref().to_string_lossy().into_owned(),
            ..StorageConfig::default()
        })
    }

    /// Private in-memory store (for testing).
    pub fn open_in_memory() -> Self {
        Self::from_config(&StorageConfig::in_memory())
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            handle: ConnectionHandle::new(config.clone()),
        }
    }

    pub fn db_path(&self) -> Option<PathBuf> {
        self.handle.db_path()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Release the connection. Later calls transparently reopen it.
    pub fn close(&self) -> LineageResult<()> {
        self.handle.close()
    }

    /// Applied schema version (opens the store if needed).
    pub fn schema_version(&self) -> LineageResult<u32> {
        self.handle.with_conn(migrations::current_version)
    }

    /// Physical and foreign-key consistency check of the database file.
    pub fn check_integrity(&self) -> LineageResult<()> {
        self.handle.with_conn(maintenance::integrity_check)
    }
}

impl ILineageStorage for StorageEngine {
    fn create_entity(&self, entity: &NewEntity) -> LineageResult<String> {
        self.handle
            .with_conn(|conn| entity_ops::create_entity(conn, entity))
    }

    fn get_entity(&self, entity_id: &str) -> LineageResult<Option<Entity>> {
        self.handle
            .with_conn(|conn| entity_ops::get_entity(conn, entity_id))
    }

    fn get_entity_by_hash(&self, hash: &str) -> LineageResult<Option<Entity>> {
        self.handle
            .with_conn(|conn| entity_ops::get_entity_by_hash(conn, hash))
    }

    fn list_entities(
        &self,
        filter: &EntityFilter,
        limit: Option<usize>,
    ) -> LineageResult<Vec<Entity>> {
        self.handle
            .with_conn(|conn| entity_ops::list_entities(conn, filter, limit))
    }

    fn update_entity(&self, entity_id: &str, update: &EntityUpdate) -> LineageResult<bool> {
        self.handle
            .with_conn(|conn| entity_ops::update_entity(conn, entity_id, update))
    }

    fn delete_entity(&self, entity_id: &str) -> LineageResult<bool> {
        self.handle
            .with_conn(|conn| entity_ops::delete_entity(conn, entity_id))
    }

    fn create_activity(&self, activity: &NewActivity) -> LineageResult<String> {
        self.handle
            .with_conn(|conn| activity_ops::create_activity(conn, activity))
    }

    fn complete_activity(
        &self,
        activity_id: &str,
        status: ActivityStatus,
        generated_entities: &[String],
    ) -> LineageResult<bool> {
        self.handle.with_conn(|conn| {
            activity_ops::complete_activity(conn, activity_id, status, generated_entities)
        })
    }

    fn get_activity(&self, activity_id: &str) -> LineageResult<Option<Activity>> {
        self.handle
            .with_conn(|conn| activity_ops::get_activity(conn, activity_id))
    }

    fn list_activities(
        &self,
        filter: &ActivityFilter,
        limit: Option<usize>,
    ) -> LineageResult<Vec<Activity>> {
        self.handle
            .with_conn(|conn| activity_ops::list_activities(conn, filter, limit))
    }

    fn activities_using_entity(&self, entity_id: &str) -> LineageResult<Vec<Activity>> {
        self.handle
            .with_conn(|conn| activity_ops::activities_using_entity(conn, entity_id))
    }

    fn delete_activity(&self, activity_id: &str) -> LineageResult<bool> {
        self.handle
            .with_conn(|conn| activity_ops::delete_activity(conn, activity_id))
    }

    fn create_agent(&self, agent: &NewAgent) -> LineageResult<String> {
        self.handle
            .with_conn(|conn| agent_ops::create_agent(conn, agent))
    }

    fn get_agent(&self, agent_id: &str) -> LineageResult<Option<Agent>> {
        self.handle
            .with_conn(|conn| agent_ops::get_agent(conn, agent_id))
    }

    fn get_or_create_agent(&self, agent: &NewAgent) -> LineageResult<String> {
        self.handle
            .with_conn(|conn| agent_ops::get_or_create_agent(conn, agent))
    }

    fn list_agents(&self, filter: &AgentFilter, limit: Option<usize>) -> LineageResult<Vec<Agent>> {
        self.handle
            .with_conn(|conn| agent_ops::list_agents(conn, filter, limit))
    }

    fn delete_agent(&self, agent_id: &str) -> LineageResult<bool> {
        self.handle
            .with_conn(|conn| agent_ops::delete_agent(conn, agent_id))
    }

    fn add_relation(&self, relation: &Relation) -> LineageResult<bool> {
        self.handle.with_conn(|conn| {
            in_transaction(conn, "add_relation", |tx| {
                relation_ops::add_relation(tx, relation)
            })
        })
    }

    fn get_relations(&self, filter: &RelationFilter) -> LineageResult<Vec<Relation>> {
        self.handle
            .with_conn(|conn| relation_ops::get_relations(conn, filter))
    }

    fn stats(&self) -> LineageResult<LineageStats> {
        self.handle.with_conn(aggregation::stats)
    }
}
