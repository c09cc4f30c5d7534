use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::kinds::RelationType;

/// A directed, typed edge between two node ids (entity, activity, or agent).
/// Append-only: never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub relation_type: RelationType,
    pub source_id: String,
    pub target_id: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Relation {
    pub fn new(
        relation_type: impl Into<RelationType>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            relation_type: relation_type.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            metadata: Metadata::new(),
        }
    }

    /// `used(activity -> entity)`
    pub fn used(activity_id: &str, entity_id: &str) -> Self {
        Self::new(RelationType::used(), activity_id, entity_id)
    }

    /// `wasGeneratedBy(entity -> activity)`
    pub fn was_generated_by(entity_id: &str, activity_id: &str) -> Self {
        Self::new(RelationType::was_generated_by(), entity_id, activity_id)
    }

    /// `wasAssociatedWith(activity -> agent)`
    pub fn was_associated_with(activity_id: &str, agent_id: &str) -> Self {
        Self::new(RelationType::was_associated_with(), activity_id, agent_id)
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn key(&self) -> RelationKey {
        RelationKey {
            relation_type: self.relation_type.clone(),
            source_id: self.source_id.clone(),
            target_id: self.target_id.clone(),
        }
    }
}

/// Identity of a relation: `(type, source, target)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationKey {
    pub relation_type: RelationType,
    pub source_id: String,
    pub target_id: String,
}

/// Filter for relation lookups. Empty filter matches every relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationFilter {
    pub relation_type: Option<RelationType>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
}

impl RelationFilter {
    pub fn of_type(relation_type: impl Into<RelationType>) -> Self {
        Self {
            relation_type: Some(relation_type.into()),
            ..Self::default()
        }
    }

    pub fn from_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn to_target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }
}
