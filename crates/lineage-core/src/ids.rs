//! Prefixed identifier generation.
//!
//! ```
//! use lineage_core::ids::new_id;
//!
//! let id = new_id("ent");
//! assert!(id.starts_with("ent-"));
//! assert_eq!(id.len(), "ent-".len() + 32);
//! ```

use uuid::Uuid;

use crate::constants::{ACTIVITY_ID_PREFIX, AGENT_ID_PREFIX, ENTITY_ID_PREFIX};

/// Create `"{prefix}-{hex}"` where the suffix is a UUID v4 rendered as 32 hex chars.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub fn new_entity_id() -> String {
    new_id(ENTITY_ID_PREFIX)
}

pub fn new_activity_id() -> String {
    new_id(ACTIVITY_ID_PREFIX)
}

pub fn new_agent_id() -> String {
    new_id(AGENT_ID_PREFIX)
}
