//! In-memory lineage graph: the unit of traversal results and export payloads.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Activity, Agent, Entity, Relation, RelationKey};

/// Deduplicated snapshot of entities, activities, agents, and relations.
/// Owned by the caller; never written back to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageGraph {
    pub entities: Vec<Entity>,
    pub activities: Vec<Activity>,
    pub agents: Vec<Agent>,
    pub relations: Vec<Relation>,
}

impl LineageGraph {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.activities.is_empty()
            && self.agents.is_empty()
            && self.relations.is_empty()
    }

    pub fn entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_id == entity_id)
    }

    pub fn contains_entity(&self, entity_id: &str) -> bool {
        self.entity(entity_id).is_some()
    }

    pub fn contains_activity(&self, activity_id: &str) -> bool {
        self.activities.iter().any(|a| a.activity_id == activity_id)
    }

    pub fn contains_agent(&self, agent_id: &str) -> bool {
        self.agents.iter().any(|a| a.agent_id == agent_id)
    }

    pub fn contains_relation(&self, relation_type: &str, source_id: &str, target_id: &str) -> bool {
        self.relations.iter().any(|r| {
            r.relation_type == relation_type && r.source_id == source_id && r.target_id == target_id
        })
    }

    pub fn entity_ids(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.entity_id.as_str()).collect()
    }

    pub fn relations_of_type<'a>(&'a self, relation_type: &'a str) -> impl Iterator<Item = &'a Relation> {
        self.relations
            .iter()
            .filter(move |r| r.relation_type == relation_type)
    }

    /// Union of two graphs. Items already present in `self` win over
    /// duplicates from `other`; nothing is merged field by field.
    pub fn merge(self, other: LineageGraph) -> LineageGraph {
        let mut builder = LineageGraphBuilder::from_graph(self);
        builder.extend(other);
        builder.build()
    }
}

/// Accumulates a [`LineageGraph`], discarding later duplicates.
/// Entities, activities, and agents dedupe by id; relations by `(type, source, target)`.
#[derive(Debug, Default)]
pub struct LineageGraphBuilder {
    graph: LineageGraph,
    seen_entities: HashSet<String>,
    seen_activities: HashSet<String>,
    seen_agents: HashSet<String>,
    seen_relations: HashSet<RelationKey>,
}

impl LineageGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: LineageGraph) -> Self {
        let mut builder = Self::new();
        builder.extend(graph);
        builder
    }

    /// Returns `false` if an entity with the same id was already added.
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        if !self.seen_entities.insert(entity.entity_id.clone()) {
            return false;
        }
        self.graph.entities.push(entity);
        true
    }

    pub fn add_activity(&mut self, activity: Activity) -> bool {
        if !self.seen_activities.insert(activity.activity_id.clone()) {
            return false;
        }
        self.graph.activities.push(activity);
        true
    }

    pub fn add_agent(&mut self, agent: Agent) -> bool {
        if !self.seen_agents.insert(agent.agent_id.clone()) {
            return false;
        }
        self.graph.agents.push(agent);
        true
    }

    pub fn add_relation(&mut self, relation: Relation) -> bool {
        if !self.seen_relations.insert(relation.key()) {
            return false;
        }
        self.graph.relations.push(relation);
        true
    }

    pub fn has_activity(&self, activity_id: &str) -> bool {
        self.seen_activities.contains(activity_id)
    }

    pub fn has_agent(&self, agent_id: &str) -> bool {
        self.seen_agents.contains(agent_id)
    }

    pub fn extend(&mut self, other: LineageGraph) {
        for entity in other.entities {
            self.add_entity(entity);
        }
        for activity in other.activities {
            self.add_activity(activity);
        }
        for agent in other.agents {
            self.add_agent(agent);
        }
        for relation in other.relations {
            self.add_relation(relation);
        }
    }

    pub fn build(self) -> LineageGraph {
        self.graph
    }
}
