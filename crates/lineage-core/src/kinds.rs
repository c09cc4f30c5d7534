//! Open, string-backed categories for entities, activities, agents, and relations.
//!
//! Callers may supply any value; unknown kinds are stored and returned unchanged.
//! The associated constants only name the values this workspace itself writes
//! or that commonly appear in pipelines.
//!
//! ```
//! use lineage_core::kinds::{EntityType, RelationType};
//!
//! let custom = EntityType::from("embedding_shard");
//! assert_eq!(custom.as_str(), "embedding_shard");
//! assert!(RelationType::from("used").is_builtin());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! open_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

open_kind!(
    /// Category of a data artefact.
    EntityType
);

open_kind!(
    /// Category of a processing step.
    ActivityType
);

open_kind!(
    /// Category of an actor.
    AgentType
);

open_kind!(
    /// Type of a directed provenance edge.
    RelationType
);

impl EntityType {
    pub const INPUT_FILE: &'static str = "input_file";
    pub const GENERATED_OUTPUT: &'static str = "generated_output";
    pub const PROMPT: &'static str = "prompt";
    pub const RESPONSE: &'static str = "response";
    pub const DATASET: &'static str = "dataset";
    pub const REPORT: &'static str = "report";
}

impl ActivityType {
    pub const LLM_CALL: &'static str = "llm_call";
    pub const TRANSFORMATION: &'static str = "transformation";
    pub const ANALYSIS: &'static str = "analysis";
    pub const IMPORT: &'static str = "import";
    pub const EXPORT: &'static str = "export";
}

impl AgentType {
    pub const TOOL: &'static str = "tool";
    pub const MODEL: &'static str = "model";
    pub const HUMAN: &'static str = "human";
}

impl RelationType {
    /// `used(activity -> entity)`
    pub const USED: &'static str = "used";
    /// `wasGeneratedBy(entity -> activity)`
    pub const WAS_GENERATED_BY: &'static str = "wasGeneratedBy";
    /// `wasAssociatedWith(activity -> agent)`
    pub const WAS_ASSOCIATED_WITH: &'static str = "wasAssociatedWith";

    /// The relation types the store writes itself.
    pub const BUILTIN: [&'static str; 3] =
        [Self::USED, Self::WAS_GENERATED_BY, Self::WAS_ASSOCIATED_WITH];

    pub fn used() -> Self {
        Self::from(Self::USED)
    }

    pub fn was_generated_by() -> Self {
        Self::from(Self::WAS_GENERATED_BY)
    }

    pub fn was_associated_with() -> Self {
        Self::from(Self::WAS_ASSOCIATED_WITH)
    }

    pub fn is_builtin(&self) -> bool {
        Self::BUILTIN.contains(&self.as_str())
    }
}
