use crate::errors::LineageResult;
use crate::models::{
    Activity, ActivityFilter, ActivityStatus, Agent, AgentFilter, Entity, EntityFilter,
    EntityUpdate, LineageStats, NewActivity, NewAgent, NewEntity, Relation, RelationFilter,
};

/// Entity + activity + agent + relation stores, plus aggregation.
///
/// Every write is atomic: a failed call leaves no partial rows behind.
pub trait ILineageStorage: Send + Sync {
    // --- Entities ---
    fn create_entity(&self, entity: &NewEntity) -> LineageResult<String>;
    fn get_entity(&self, entity_id: &str) -> LineageResult<Option<Entity>>;
    /// First match among entities sharing `hash`; which duplicate wins is unspecified.
    fn get_entity_by_hash(&self, hash: &str) -> LineageResult<Option<Entity>>;
    /// Newest first by `generated_at`.
    fn list_entities(
        &self,
        filter: &EntityFilter,
        limit: Option<usize>,
    ) -> LineageResult<Vec<Entity>>;
    fn update_entity(&self, entity_id: &str, update: &EntityUpdate) -> LineageResult<bool>;
    fn delete_entity(&self, entity_id: &str) -> LineageResult<bool>;

    // --- Activities ---
    fn create_activity(&self, activity: &NewActivity) -> LineageResult<String>;
    fn complete_activity(
        &self,
        activity_id: &str,
        status: ActivityStatus,
        generated_entities: &[String],
    ) -> LineageResult<bool>;
    fn get_activity(&self, activity_id: &str) -> LineageResult<Option<Activity>>;
    /// Newest first by `started_at`.
    fn list_activities(
        &self,
        filter: &ActivityFilter,
        limit: Option<usize>,
    ) -> LineageResult<Vec<Activity>>;
    /// Activities whose used set contains `entity_id`.
    fn activities_using_entity(&self, entity_id: &str) -> LineageResult<Vec<Activity>>;
    fn delete_activity(&self, activity_id: &str) -> LineageResult<bool>;

    // --- Agents ---
    fn create_agent(&self, agent: &NewAgent) -> LineageResult<String>;
    fn get_agent(&self, agent_id: &str) -> LineageResult<Option<Agent>>;
    fn get_or_create_agent(&self, agent: &NewAgent) -> LineageResult<String>;
    fn list_agents(&self, filter: &AgentFilter, limit: Option<usize>) -> LineageResult<Vec<Agent>>;
    fn delete_agent(&self, agent_id: &str) -> LineageResult<bool>;

    // --- Relations ---
    /// Idempotent: returns `false` when the `(type, source, target)` triple already exists.
    fn add_relation(&self, relation: &Relation) -> LineageResult<bool>;
    fn get_relations(&self, filter: &RelationFilter) -> LineageResult<Vec<Relation>>;

    // --- Aggregation ---
    fn stats(&self) -> LineageResult<LineageStats>;
}
