//! Forward traversal: follows consuming activities to the entities they produced.

use std::collections::{HashSet, VecDeque};

use lineage_core::errors::LineageResult;
use lineage_core::models::{LineageGraph, Relation};
use lineage_core::traits::ILineageStorage;

use super::{expandable, Walk};

/// Collect everything derived from `entity_id`.
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
        walk.add_entity(entity);

        if !expandable(depth, max_depth) {
            continue;
        }

        for activity in walk.storage().activities_using_entity(&current_id)? {
            let activity_id = activity.activity_id.clone();
            let generated = activity.generated_entities.clone();
            walk.adopt(activity)?;
            walk.add_relation(Relation::used(&activity_id, &current_id));

            for generated_id in &generated {
                walk.add_relation(Relation::was_generated_by(generated_id, &activity_id));
                if !visited.insert(generated_id.clone()) {
                    continue;
                }
                if let Some(produced) = walk.storage().get_entity(generated_id)? {
                    queue.push_back((produced, depth + 1));
                }
            }
        }
    }

    let graph = walk.finish();
    tracing::debug!(
        entity_id = %entity_id,
        entities = graph.entities.len(),
        activities = graph.activities.len(),
        "descendants traced"
    );
    Ok(graph)
}
