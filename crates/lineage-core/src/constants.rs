/// Lineage store version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Latest schema version written by the storage migrations.
pub const SCHEMA_VERSION: u32 = 1;

/// Identifier prefix for entities.
pub const ENTITY_ID_PREFIX: &str = "ent";

/// Identifier prefix for activities.
pub const ACTIVITY_ID_PREFIX: &str = "act";

/// Identifier prefix for agents.
pub const AGENT_ID_PREFIX: &str = "agt";

/// PROV-JSON key for relation identifiers (blank-node form).
pub const PROV_BLANK_NODE_PREFIX: &str = "_:";
