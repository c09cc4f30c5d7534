//! Property tests: traversal on random DAGs matches in-memory reachability,
//! duality, and depth bounds.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use lineage_core::config::LineageConfig;
use lineage_core::models::{NewActivity, NewAgent, NewEntity};
use lineage_core::{ActivityStatus, ILineageStorage};
use lineage_graph::LineageEngine;
use lineage_storage::StorageEngine;

/// Node `i > 0` is produced by one activity that used `inputs[i - 1]`
/// (indices reduced modulo `i`, so every edge points backwards).
fn dag_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2usize..9).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(0usize..100, 0..3), n - 1)
    })
}

struct Built {
    engine: LineageEngine<StorageEngine>,
    ids: Vec<String>,
    parents: Vec<BTreeSet<usize>>,
}

fn build(inputs: &[Vec<usize>]) -> Built {
    let engine = LineageEngine::new(StorageEngine::open_in_memory(), LineageConfig::default());
    let store = engine.storage();
    let agent = store.create_agent(&NewAgent::new("tool", "gen")).unwrap();

    let mut ids = vec![store
        .create_entity(&NewEntity::new("dataset", "n0", "h"))
        .unwrap()];
    let mut parents = vec![BTreeSet::new()];

    for (offset, raw) in inputs.iter().enumerate() {
        let i = offset + 1;
        let used: BTreeSet<usize> = raw.iter().map(|r| r % i).collect();
        let act = store
            .create_activity(
                &NewActivity::new("transformation", format!("make{i}"), &agent)
                    .using(used.iter().map(|&u| ids[u].clone())),
            )
            .unwrap();
        let id = store
            .create_entity(&NewEntity::new("dataset", format!("n{i}"), "h"))
            .unwrap();
        store
            .complete_activity(&act, ActivityStatus::Completed, &[id.clone()])
            .unwrap();
        ids.push(id);
        parents.push(used);
    }
    Built {
        engine,
        ids,
        parents,
    }
}

/// Indices reachable from `start` by following parent edges, including `start`.
fn reachable(parents: &[BTreeSet<usize>], start: usize) -> BTreeSet<usize> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        if seen.insert(node) {
            stack.extend(parents[node].iter().copied());
        }
    }
    seen
}

fn entity_set(graph: &lineage_core::LineageGraph) -> HashSet<String> {
    graph.entities.iter().map(|e| e.entity_id.clone()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_ancestors_match_reachability(inputs in dag_strategy()) {
        let built = build(&inputs);
        for node in 0..built.ids.len() {
            let graph = built.engine.ancestors(&built.ids[node], None).unwrap();
            let expected: HashSet<String> = reachable(&built.parents, node)
                .into_iter()
                .map(|i| built.ids[i].clone())
                .collect();
            prop_assert_eq!(entity_set(&graph), expected);
        }
    }

    #[test]
    fn prop_duality(inputs in dag_strategy()) {
        let built = build(&inputs);
        let ancestors: Vec<HashSet<String>> = built
            .ids
            .iter()
            .map(|id| entity_set(&built.engine.ancestors(id, None).unwrap()))
            .collect();
        for (x, x_id) in built.ids.iter().enumerate() {
            let descendants = entity_set(&built.engine.descendants(x_id, None).unwrap());
            for (y, y_id) in built.ids.iter().enumerate() {
                prop_assert_eq!(
                    descendants.contains(y_id),
                    ancestors[y].contains(x_id),
                    "x={} y={}", x, y
                );
            }
        }
    }

    #[test]
    fn prop_depth_bound_limits_growth(inputs in dag_strategy(), depth in 0usize..4) {
        let built = build(&inputs);
        let last = built.ids.last().unwrap();
        let bounded = built.engine.ancestors(last, Some(depth)).unwrap();
        let deeper = built.engine.ancestors(last, Some(depth + 1)).unwrap();
        let unbounded = built.engine.ancestors(last, None).unwrap();

        let bounded_set = entity_set(&bounded);
        prop_assert!(bounded_set.is_subset(&entity_set(&deeper)));
        prop_assert!(entity_set(&deeper).is_subset(&entity_set(&unbounded)));
        prop_assert!(bounded_set.contains(last));
        if depth == 0 {
            prop_assert_eq!(bounded.entities.len(), 1);
            prop_assert!(bounded.relations.is_empty());
        }
    }
}
