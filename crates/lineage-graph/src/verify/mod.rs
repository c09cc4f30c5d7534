//! Integrity verifier: re-hashes recorded files and compares them with the
//! stored content hashes.
//!
//! Findings are values, never errors; only storage failures return `Err`.

mod report;

use std::io;
use std::path::Path;

use lineage_core::errors::LineageResult;
use lineage_core::models::Entity;
use lineage_core::traits::{ContentHasher, ILineageStorage};

use crate::traversal::TraversalEngine;

pub use report::{ChainVerification, EntityVerification, VerificationIssue};

/// Note attached to entities that have no path to re-hash.
pub const NO_PATH_NOTE: &str = "no path recorded; hash cannot be checked independently";

pub struct IntegrityVerifier {
    hasher: Box<dyn ContentHasher>,
}

impl IntegrityVerifier {
    pub fn new(hasher: Box<dyn ContentHasher>) -> Self {
        Self { hasher }
    }

    /// Check one entity. Never retries a failed read.
    pub fn verify_entity<S: ILineageStorage + ?Sized>(
        &self,
        storage: &S,
        entity_id: &str,
    ) -> LineageResult<EntityVerification> {
        let result = match storage.get_entity(entity_id)? {
            Some(entity) => self.check(&entity),
            None => EntityVerification::invalid(entity_id, None, None, VerificationIssue::NotFound),
        };
        if !result.verified {
            tracing::warn!(
                entity_id = %entity_id,
                issue = ?result.issue,
                "entity failed verification"
            );
        }
        Ok(result)
    }

    /// Check the root and every ancestor. A missing root is reported as a
    /// single `NotFound` detail rather than an error.
    pub fn verify_chain<S: ILineageStorage + ?Sized>(
        &self,
        storage: &S,
        traversal: &TraversalEngine,
        entity_id: &str,
    ) -> LineageResult<ChainVerification> {
        let details = match traversal.ancestors(storage, entity_id, None) {
            Ok(graph) => graph.entities.iter().map(|e| self.check(e)).collect(),
            Err(e) if e.is_not_found() => vec![EntityVerification::invalid(
                entity_id,
                None,
                None,
                VerificationIssue::NotFound,
            )],
            Err(e) => return Err(e),
        };

        let report = ChainVerification::from_details(entity_id, details);
        if report.verified {
            tracing::debug!(
                entity_id = %entity_id,
                checked = report.entities_checked,
                "chain verified"
            );
        } else {
            tracing::warn!(
                entity_id = %entity_id,
                invalid = ?report.entities_invalid,
                "chain failed verification"
            );
        }
        Ok(report)
    }

    fn check(&self, entity: &Entity) -> EntityVerification {
        let Some(path) = entity.path.as_deref() else {
            return EntityVerification::valid(&entity.entity_id, &entity.hash, None)
                .with_note(NO_PATH_NOTE);
        };

        let path = Path::new(path);
        match path.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                return EntityVerification::invalid(
                    &entity.entity_id,
                    Some(&entity.hash),
                    None,
                    VerificationIssue::FileMissing,
                );
            }
            Err(e) => {
                return EntityVerification::invalid(
                    &entity.entity_id,
                    Some(&entity.hash),
                    None,
                    VerificationIssue::Io {
                        message: e.to_string(),
                    },
                );
            }
        }

        match self.hasher.hash_file(path) {
            Ok(current) if current == entity.hash => {
                EntityVerification::valid(&entity.entity_id, &entity.hash, Some(current))
            }
            Ok(current) => EntityVerification::invalid(
                &entity.entity_id,
                Some(&entity.hash),
                Some(current),
                VerificationIssue::HashMismatch,
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => EntityVerification::invalid(
                &entity.entity_id,
                Some(&entity.hash),
                None,
                VerificationIssue::FileMissing,
            ),
            Err(e) => EntityVerification::invalid(
                &entity.entity_id,
                Some(&entity.hash),
                None,
                VerificationIssue::Io {
                    message: e.to_string(),
                },
            ),
        }
    }
}
