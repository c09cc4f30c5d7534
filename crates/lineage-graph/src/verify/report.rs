use serde::{Deserialize, Serialize};

/// Why an entity failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationIssue {
    /// No entity with that id.
    NotFound,
    /// The recorded path does not exist.
    FileMissing,
    /// The file exists but its digest differs from the stored hash.
    HashMismatch,
    /// The file could not be read.
    Io { message: String },
}

/// Outcome of checking one entity against the filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityVerification {
    pub entity_id: String,
    pub verified: bool,
    /// `None` only when the entity does not exist.
    pub stored_hash: Option<String>,
    /// Digest of the file as it is now, when it could be computed.
    pub current_hash: Option<String>,
    pub issue: Option<VerificationIssue>,
    pub note: Option<String>,
}

impl EntityVerification {
    pub(crate) fn valid(entity_id: &str, stored_hash: &str, current_hash: Option<String>) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            verified: true,
            stored_hash: Some(stored_hash.to_string()),
            current_hash,
            issue: None,
            note: None,
        }
    }

    pub(crate) fn invalid(
        entity_id: &str,
        stored_hash: Option<&str>,
        current_hash: Option<String>,
        issue: VerificationIssue,
    ) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            verified: false,
            stored_hash: stored_hash.map(str::to_string),
            current_hash,
            issue: Some(issue),
            note: None,
        }
    }

    pub(crate) fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Outcome of checking every entity in an ancestor chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub root_id: String,
    /// True iff `entities_invalid` is empty.
    pub verified: bool,
    pub entities_checked: usize,
    pub entities_valid: usize,
    pub entities_invalid: Vec<String>,
    pub details: Vec<EntityVerification>,
}

impl ChainVerification {
    pub(crate) fn from_details(root_id: &str, details: Vec<EntityVerification>) -> Self {
        let entities_invalid: Vec<String> = details
            .iter()
            .filter(|d| !d.verified)
            .map(|d| d.entity_id.clone())
            .collect();
        Self {
            root_id: root_id.to_string(),
            verified: entities_invalid.is_empty(),
            entities_checked: details.len(),
            entities_valid: details.len() - entities_invalid.len(),
            entities_invalid,
            details,
        }
    }
}
