//! Provenance data model: entities, activities, agents, relations, and the
//! in-memory lineage graph returned by traversals.

pub mod activity;
pub mod agent;
pub mod entity;
pub mod graph;
pub mod relation;
pub mod stats;

use std::collections::BTreeMap;

pub use activity::{Activity, ActivityFilter, ActivityStatus, NewActivity};
pub use agent::{Agent, AgentFilter, NewAgent};
pub use entity::{Entity, EntityFilter, EntityUpdate, NewEntity};
pub use graph::{LineageGraph, LineageGraphBuilder};
pub use relation::{Relation, RelationFilter, RelationKey};
pub use stats::LineageStats;

/// Open, string-keyed metadata map. Ordered so exports are deterministic.
pub type Metadata = BTreeMap<String, serde_json::Value>;
