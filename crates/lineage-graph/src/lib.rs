//! # lineage-graph
//!
//! Reads a lineage store through [`ILineageStorage`](lineage_core::ILineageStorage)
//! and answers "where did this come from" and "what depends on this":
//! breadth-first ancestor/descendant traversal, filesystem integrity
//! verification, and PROV-JSON export.

pub mod engine;
pub mod export;
pub mod traversal;
pub mod verify;

pub use engine::LineageEngine;
pub use export::ProvDocument;
pub use traversal::TraversalEngine;
pub use verify::{
    ChainVerification, EntityVerification, IntegrityVerifier, VerificationIssue,
};
