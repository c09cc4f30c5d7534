//! Integration test: relation idempotency, filters, insertion order.

use lineage_core::models::{Relation, RelationFilter};
use lineage_core::{ILineageStorage, Metadata};
use lineage_storage::StorageEngine;

#[test]
fn test_add_relation_is_idempotent() {
    let engine = StorageEngine::open_in_memory();
    let rel = Relation::new("wasDerivedFrom", "ent-b", "ent-a");

    assert!(engine.add_relation(&rel).unwrap());
    assert!(!engine.add_relation(&rel).unwrap());

    let stored = engine.get_relations(&RelationFilter::default()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], rel);
}

#[test]
fn test_duplicate_keeps_original_metadata() {
    let engine = StorageEngine::open_in_memory();
    let mut meta = Metadata::new();
    meta.insert("confidence".into(), serde_json::json!(0.9));
    let original = Relation::new("wasDerivedFrom", "ent-b", "ent-a").with_metadata(meta.clone());
    engine.add_relation(&original).unwrap();

    let mut other = Metadata::new();
    other.insert("confidence".into(), serde_json::json!(0.1));
    let dup = Relation::new("wasDerivedFrom", "ent-b", "ent-a").with_metadata(other);
    assert!(!engine.add_relation(&dup).unwrap());

    let stored = engine.get_relations(&RelationFilter::default()).unwrap();
    assert_eq!(stored[0].metadata, meta);
}

#[test]
fn test_get_relations_filters_in_insertion_order() {
    let engine = StorageEngine::open_in_memory();
    engine.add_relation(&Relation::new("cites", "a", "b")).unwrap();
    engine.add_relation(&Relation::new("cites", "a", "c")).unwrap();
    engine.add_relation(&Relation::new("reviews", "a", "b")).unwrap();
    engine.add_relation(&Relation::new("cites", "d", "b")).unwrap();

    let from_a = engine
        .get_relations(&RelationFilter::default().from_source("a"))
        .unwrap();
    let targets: Vec<&str> = from_a.iter().map(|r| r.target_id.as_str()).collect();
    assert_eq!(targets, vec!["b", "c", "b"]);

    let cites_b = engine
        .get_relations(&RelationFilter::of_type("cites").to_target("b"))
        .unwrap();
    let sources: Vec<&str> = cites_b.iter().map(|r| r.source_id.as_str()).collect();
    assert_eq!(sources, vec!["a", "d"]);

    let none = engine
        .get_relations(&RelationFilter::of_type("unknown"))
        .unwrap();
    assert!(none.is_empty());
}
