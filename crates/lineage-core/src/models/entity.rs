use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::kinds::EntityType;

/// A tracked data artefact: an input file or a generated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub name: String,
    /// Content digest. Not unique: the same content may be registered twice.
    pub hash: String,
    pub path: Option<String>,
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Activity that produced this entity. `None` for pure inputs.
    pub generated_by: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// Insert payload for an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntity {
    pub entity_type: EntityType,
    pub name: String,
    pub hash: String,
    pub path: Option<String>,
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub metadata: Metadata,
    pub generated_by: Option<String>,
}

impl NewEntity {
    pub fn new(
        entity_type: impl Into<EntityType>,
        name: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            name: name.into(),
            hash: hash.into(),
            path: None,
            size_bytes: None,
            metadata: Metadata::new(),
            generated_by: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn generated_by(mut self, activity_id: impl Into<String>) -> Self {
        self.generated_by = Some(activity_id.into());
        self
    }
}

/// Partial update for an entity. `None` fields are left untouched;
/// `metadata`, when present, replaces the stored map wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityUpdate {
    pub entity_type: Option<EntityType>,
    pub name: Option<String>,
    pub hash: Option<String>,
    pub path: Option<String>,
    pub size_bytes: Option<u64>,
    pub metadata: Option<Metadata>,
}

impl EntityUpdate {
    pub fn is_empty(&self) -> bool {
        self.entity_type.is_none()
            && self.name.is_none()
            && self.hash.is_none()
            && self.path.is_none()
            && self.size_bytes.is_none()
            && self.metadata.is_none()
    }
}

/// Filter for entity listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityFilter {
    pub entity_type: Option<EntityType>,
    pub generated_by: Option<String>,
}

impl EntityFilter {
    pub fn by_type(entity_type: impl Into<EntityType>) -> Self {
        Self {
            entity_type: Some(entity_type.into()),
            ..Self::default()
        }
    }

    pub fn by_producer(activity_id: impl Into<String>) -> Self {
        Self {
            generated_by: Some(activity_id.into()),
            ..Self::default()
        }
    }
}
