//! Backward traversal: follows `generated_by` to the producing activity, then
//! that activity's used entities.

use std::collections::{HashSet, VecDeque};

use lineage_core::errors::LineageResult;
use lineage_core::models::{LineageGraph, Relation};
use lineage_core::traits::ILineageStorage;

use super::{expandable, Walk};

/// Collect everything `entity_id` was derived from.
///
/// An entity without a producer is a leaf. Entities that disappeared from the
/// store mid-walk are skipped; a missing root is `NotFound`.
pub fn trace<S: ILineageStorage + ?Sized>(
    storage: &S,
    entity_id: &str,
    max_depth: Option<usize>,
) -> LineageResult<LineageGraph> {
    let mut walk = Walk::new(storage);
    let root = walk.root(entity_id)?;

    let mut visited = HashSet::new();
    visited.insert(root.entity_id.clone());

    let mut queue = VecDeque::new();
    queue.push_back((root, 0usize));

    while let Some((entity, depth)) = queue.pop_front() {
        let current_id = entity.entity_id.clone();
        let producer = entity.generated_by.clone();
        walk.add_entity(entity);

        if !expandable(depth, max_depth) {
            continue;
        }
        let Some(activity_id) = producer else {
            continue;
        };
        let Some(activity) = walk.activity(&activity_id)? else {
            continue;
        };

        walk.add_relation(Relation::was_generated_by(&current_id, &activity_id));
        for used_id in &activity.used_entities {
            walk.add_relation(Relation::used(&activity_id, used_id));
            if !visited.insert(used_id.clone()) {
                continue;
            }
            if let Some(used) = walk.storage().get_entity(used_id)? {
                queue.push_back((used, depth + 1));
            }
        }
    }

    let graph = walk.finish();
    tracing::debug!(
        entity_id = %entity_id,
        entities = graph.entities.len(),
        activities = graph.activities.len(),
        "ancestors traced"
    );
    Ok(graph)
}
