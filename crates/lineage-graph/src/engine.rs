//! LineageEngine: owns a store and coordinates traversal, verification, and export.

use lineage_core::config::LineageConfig;
use lineage_core::errors::LineageResult;
use lineage_core::models::LineageGraph;
use lineage_core::traits::{Blake3Hasher, ContentHasher, ILineageStorage};

use crate::export::{export_store, ProvDocument};
use crate::traversal::TraversalEngine;
use crate::verify::{ChainVerification, EntityVerification, IntegrityVerifier};

/// The main lineage engine.
pub struct LineageEngine<S: ILineageStorage> {
    storage: S,
    traversal: TraversalEngine,
    verifier: IntegrityVerifier,
    config: LineageConfig,
}

impl<S: ILineageStorage> LineageEngine<S> {
    /// Engine with the default BLAKE3 hasher.
    pub fn new(storage: S, config: LineageConfig) -> Self {
        let hasher = Blake3Hasher::with_buffer_size(config.verification.read_buffer_size);
        Self::with_hasher(storage, Box::new(hasher), config)
    }

    /// Engine with a caller-supplied hasher; it must be the digest that
    /// produced the stored hashes.
    pub fn with_hasher(storage: S, hasher: Box<dyn ContentHasher>, config: LineageConfig) -> Self {
        Self {
            storage,
            traversal: TraversalEngine::new(config.traversal.clone()),
            verifier: IntegrityVerifier::new(hasher),
            config,
        }
    }

    /// Direct access to the underlying store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &LineageConfig {
        &self.config
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // --- Traversal ---

    pub fn ancestors(&self, entity_id: &str, max_depth: Option<usize>) -> LineageResult<LineageGraph> {
        self.traversal.ancestors(&self.storage, entity_id, max_depth)
    }

    pub fn descendants(
        &self,
        entity_id: &str,
        max_depth: Option<usize>,
    ) -> LineageResult<LineageGraph> {
        self.traversal
            .descendants(&self.storage, entity_id, max_depth)
    }

    pub fn full_lineage(
        &self,
        entity_id: &str,
        max_depth: Option<usize>,
    ) -> LineageResult<LineageGraph> {
        self.traversal
            .full_lineage(&self.storage, entity_id, max_depth)
    }

    // --- Verification ---

    pub fn verify_entity(&self, entity_id: &str) -> LineageResult<EntityVerification> {
        self.verifier.verify_entity(&self.storage, entity_id)
    }

    pub fn verify_chain(&self, entity_id: &str) -> LineageResult<ChainVerification> {
        self.verifier
            .verify_chain(&self.storage, &self.traversal, entity_id)
    }

    // --- Export ---

    /// Full lineage of `entity_id` as PROV-JSON, or the whole store when `None`.
    pub fn export_prov_json(&self, entity_id: Option<&str>) -> LineageResult<ProvDocument> {
        match entity_id {
            Some(entity_id) => {
                let graph = self.full_lineage(entity_id, None)?;
                Ok(ProvDocument::from_graph(&graph, &self.config.export))
            }
            None => export_store(&self.storage, &self.config.export),
        }
    }
}
