//! Property tests: entity roundtrip, relation idempotency, activity mirror.

use proptest::prelude::*;

use lineage_core::models::{NewActivity, NewAgent, NewEntity, Relation, RelationFilter};
use lineage_core::{ActivityStatus, ILineageStorage, Metadata, RelationType};
use lineage_storage::StorageEngine;

proptest! {
    #[test]
    fn prop_entity_roundtrip(
        name in "[a-zA-Z0-9 ._-]{1,64}",
        hash in "[0-9a-f]{64}",
        size in proptest::option::of(0u64..(i64::MAX as u64)),
        rows in any::<i32>(),
    ) {
        let engine = StorageEngine::open_in_memory();
        let mut meta = Metadata::new();
        meta.insert("rows".into(), serde_json::json!(rows));
        let mut payload = NewEntity::new("dataset", name.clone(), hash.clone()).with_metadata(meta.clone());
        payload.size_bytes = size;

        let id = engine.create_entity(&payload).unwrap();
        let entity = engine.get_entity(&id).unwrap().unwrap();
        prop_assert_eq!(entity.name, name);
        prop_assert_eq!(entity.hash, hash);
        prop_assert_eq!(entity.size_bytes, size);
        prop_assert_eq!(entity.metadata, meta);
    }

    #[test]
    fn prop_relation_insert_is_idempotent(
        triples in proptest::collection::vec(("[a-c]", "[a-d]", "[a-d]"), 1..40)
    ) {
        let engine = StorageEngine::open_in_memory();
        let mut distinct = std::collections::HashSet::new();
        for (rel_type, src, tgt) in &triples {
            let inserted = engine.add_relation(&Relation::new(rel_type.as_str(), src.as_str(), tgt.as_str())).unwrap();
            let first_time = distinct.insert((rel_type.clone(), src.clone(), tgt.clone()));
            prop_assert_eq!(inserted, first_time);
        }
        let stored = engine.get_relations(&RelationFilter::default()).unwrap();
        prop_assert_eq!(stored.len(), distinct.len());
    }

    #[test]
    fn prop_activity_sets_mirror_relations(used_count in 0usize..6, generated_count in 0usize..6) {
        let engine = StorageEngine::open_in_memory();
        let agent = engine.create_agent(&NewAgent::new("tool", "t")).unwrap();
        let used: Vec<String> = (0..used_count)
            .map(|i| engine.create_entity(&NewEntity::new("input_file", format!("in{i}"), "h")).unwrap())
            .collect();
        let act = engine
            .create_activity(&NewActivity::new("transformation", "t", &agent).using(used.iter()))
            .unwrap();
        let generated: Vec<String> = (0..generated_count)
            .map(|i| engine.create_entity(&NewEntity::new("dataset", format!("out{i}"), "h")).unwrap())
            .collect();
        engine.complete_activity(&act, ActivityStatus::Completed, &generated).unwrap();

        let activity = engine.get_activity(&act).unwrap().unwrap();
        for entity_id in &activity.used_entities {
            let rels = engine
                .get_relations(&RelationFilter::of_type(RelationType::USED).from_source(&act).to_target(entity_id))
                .unwrap();
            prop_assert_eq!(rels.len(), 1);
        }
        for entity_id in &activity.generated_entities {
            let rels = engine
                .get_relations(&RelationFilter::of_type(RelationType::WAS_GENERATED_BY).from_source(entity_id).to_target(&act))
                .unwrap();
            prop_assert_eq!(rels.len(), 1);
        }
        prop_assert_eq!(activity.used_entities, used);
        prop_assert_eq!(activity.generated_entities, generated);
    }
}
