use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::kinds::AgentType;

/// An actor responsible for activities: a tool, a model, or a person.
/// `(agent_type, name, version)` is unique, with `version = None` as its own case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: String,
    pub agent_type: AgentType,
    pub name: String,
    pub version: Option<String>,
    pub provider: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAgent {
    pub agent_type: AgentType,
    pub name: String,
    pub version: Option<String>,
    pub provider: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewAgent {
    pub fn new(agent_type: impl Into<AgentType>, name: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            name: name.into(),
            version: None,
            provider: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Filter for agent listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentFilter {
    pub agent_type: Option<AgentType>,
    pub name: Option<String>,
    pub provider: Option<String>,
}
