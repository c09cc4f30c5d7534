//! # lineage-core
//!
//! Foundation crate for the lineage store.
//! Defines the provenance data model, open kinds, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod kinds;
pub mod models;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::LineageConfig;
pub use errors::{LineageError, LineageResult, NodeKind};
pub use kinds::{ActivityType, AgentType, EntityType, RelationType};
pub use models::{
    Activity, ActivityStatus, Agent, Entity, LineageGraph, LineageGraphBuilder, Metadata,
    Relation, RelationKey,
};
pub use traits::{Blake3Hasher, ContentHasher, ILineageStorage};
