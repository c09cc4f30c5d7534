use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::errors::LineageError;
use crate::kinds::ActivityType;

/// Lifecycle state of an activity. `Running` is the only legal initial state;
/// an activity moves once, to `Completed` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Running,
    Completed,
    Failed,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityStatus {
    type Err = LineageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(LineageError::InvalidInput(format!(
                "unknown activity status: {other}"
            ))),
        }
    }
}

/// A recorded processing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    pub activity_type: ActivityType,
    pub name: String,
    pub agent_id: String,
    /// External correlation id (e.g. an experiment run).
    pub run_id: Option<String>,
    pub used_entities: Vec<String>,
    pub generated_entities: Vec<String>,
    #[serde(default)]
    pub parameters: Metadata,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: ActivityStatus,
}

/// Insert payload for an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub name: String,
    pub agent_id: String,
    pub run_id: Option<String>,
    #[serde(default)]
    pub used_entities: Vec<String>,
    #[serde(default)]
    pub generated_entities: Vec<String>,
    #[serde(default)]
    pub parameters: Metadata,
}

impl NewActivity {
    pub fn new(
        activity_type: impl Into<ActivityType>,
        name: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            activity_type: activity_type.into(),
            name: name.into(),
            agent_id: agent_id.into(),
            run_id: None,
            used_entities: Vec::new(),
            generated_entities: Vec::new(),
            parameters: Metadata::new(),
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn using<I, S>(mut self, entity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used_entities.extend(entity_ids.into_iter().map(Into::into));
        self
    }

    pub fn generating<I, S>(mut self, entity_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generated_entities
            .extend(entity_ids.into_iter().map(Into::into));
        self
    }

    pub fn with_parameters(mut self, parameters: Metadata) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Filter for activity listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityFilter {
    pub activity_type: Option<ActivityType>,
    pub agent_id: Option<String>,
    pub run_id: Option<String>,
}
