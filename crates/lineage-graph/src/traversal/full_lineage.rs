//! Full lineage: union of the backward and forward walks.

use lineage_core::errors::LineageResult;
use lineage_core::models::LineageGraph;
use lineage_core::traits::ILineageStorage;

use super::{trace_ancestors, trace_descendants};

/// Ancestors then descendants, deduplicated first-seen-wins by id and by
/// relation triple.
pub fn trace<S: ILineageStorage + ?Sized>(
    storage: &S,
    entity_id: &str,
    max_depth: Option<usize>,
) -> LineageResult<LineageGraph> {
    let ancestors = trace_ancestors::trace(storage, entity_id, max_depth)?;
    let descendants = trace_descendants::trace(storage, entity_id, max_depth)?;
    Ok(ancestors.merge(descendants))
}
