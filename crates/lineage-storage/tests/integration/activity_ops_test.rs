//! Integration test: activity lifecycle, derived relations, atomicity.

use lineage_core::errors::LineageError;
use lineage_core::models::{ActivityFilter, NewActivity, NewAgent, NewEntity, RelationFilter};
use lineage_core::{ActivityStatus, ILineageStorage, NodeKind, RelationType};
use lineage_storage::StorageEngine;

struct Fixture {
    engine: StorageEngine,
    agent: String,
}

fn setup() -> Fixture {
    let engine = StorageEngine::open_in_memory();
    let agent = engine.create_agent(&NewAgent::new("tool", "loader")).unwrap();
    Fixture { engine, agent }
}

fn entity(engine: &StorageEngine, name: &str) -> String {
    engine
        .create_entity(&NewEntity::new("input_file", name, format!("hash-{name}")))
        .unwrap()
}

#[test]
fn test_create_activity_writes_relations() {
    let fx = setup();
    let e1 = entity(&fx.engine, "e1");
    let e2 = entity(&fx.engine, "e2");

    let act = fx
        .engine
        .create_activity(&NewActivity::new("transformation", "join", &fx.agent).using([&e1, &e2]))
        .unwrap();
    assert!(act.starts_with("act-"));

    let activity = fx.engine.get_activity(&act).unwrap().unwrap();
    assert_eq!(activity.status, ActivityStatus::Running);
    assert_eq!(activity.used_entities, vec![e1.clone(), e2.clone()]);
    assert!(activity.generated_entities.is_empty());
    assert!(activity.ended_at.is_none());

    let used = fx
        .engine
        .get_relations(&RelationFilter::of_type(RelationType::USED).from_source(&act))
        .unwrap();
    assert_eq!(used.len(), 2);
    assert_eq!(used[0].target_id, e1);
    assert_eq!(used[1].target_id, e2);

    let assoc = fx
        .engine
        .get_relations(&RelationFilter::of_type(RelationType::WAS_ASSOCIATED_WITH))
        .unwrap();
    assert_eq!(assoc.len(), 1);
    assert_eq!(assoc[0].source_id, act);
    assert_eq!(assoc[0].target_id, fx.agent);
}

#[test]
fn test_create_activity_with_unknown_agent_fails() {
    let fx = setup();
    let err = fx
        .engine
        .create_activity(&NewActivity::new("analysis", "scan", "agt-missing"))
        .unwrap_err();
    assert!(matches!(
        err,
        LineageError::NotFound { kind: NodeKind::Agent, .. }
    ));
}

#[test]
fn test_failed_create_rolls_back_everything() {
    let fx = setup();
    let e1 = entity(&fx.engine, "e1");
    let before = fx.engine.stats().unwrap();

    let err = fx
        .engine
        .create_activity(
            &NewActivity::new("transformation", "broken", &fx.agent).using([e1.as_str(), "ent-missing"]),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        LineageError::NotFound { kind: NodeKind::Entity, .. }
    ));

    let after = fx.engine.stats().unwrap();
    assert_eq!(after, before);
    assert!(fx
        .engine
        .list_activities(&ActivityFilter::default(), None)
        .unwrap()
        .is_empty());
    assert!(fx
        .engine
        .get_relations(&RelationFilter::default())
        .unwrap()
        .is_empty());
    assert!(fx.engine.activities_using_entity(&e1).unwrap().is_empty());
}

#[test]
fn test_complete_activity_attaches_outputs() {
    let fx = setup();
    let e1 = entity(&fx.engine, "e1");
    let act = fx
        .engine
        .create_activity(&NewActivity::new("transformation", "t", &fx.agent).using([&e1]))
        .unwrap();
    let e2 = entity(&fx.engine, "e2");

    assert!(fx
        .engine
        .complete_activity(&act, ActivityStatus::Completed, &[e2.clone()])
        .unwrap());

    let activity = fx.engine.get_activity(&act).unwrap().unwrap();
    assert_eq!(activity.status, ActivityStatus::Completed);
    assert!(activity.ended_at.is_some());
    assert!(activity.ended_at.unwrap() >= activity.started_at);
    assert_eq!(activity.generated_entities, vec![e2.clone()]);

    let produced = fx.engine.get_entity(&e2).unwrap().unwrap();
    assert_eq!(produced.generated_by.as_deref(), Some(act.as_str()));

    let generated = fx
        .engine
        .get_relations(&RelationFilter::of_type(RelationType::WAS_GENERATED_BY))
        .unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].source_id, e2);
    assert_eq!(generated[0].target_id, act);
}

#[test]
fn test_complete_unknown_activity_returns_false() {
    let fx = setup();
    assert!(!fx
        .engine
        .complete_activity("act-missing", ActivityStatus::Failed, &[])
        .unwrap());
}

#[test]
fn test_complete_with_running_is_invalid() {
    let fx = setup();
    let act = fx
        .engine
        .create_activity(&NewActivity::new("analysis", "a", &fx.agent))
        .unwrap();
    let err = fx
        .engine
        .complete_activity(&act, ActivityStatus::Running, &[])
        .unwrap_err();
    assert!(matches!(err, LineageError::InvalidInput(_)));
}

#[test]
fn test_complete_twice_is_invalid_transition() {
    let fx = setup();
    let act = fx
        .engine
        .create_activity(&NewActivity::new("analysis", "a", &fx.agent))
        .unwrap();
    fx.engine
        .complete_activity(&act, ActivityStatus::Failed, &[])
        .unwrap();

    let err = fx
        .engine
        .complete_activity(&act, ActivityStatus::Completed, &[])
        .unwrap_err();
    match err {
        LineageError::InvalidTransition { from, to, .. } => {
            assert_eq!(from, ActivityStatus::Failed);
            assert_eq!(to, ActivityStatus::Completed);
        }
        other => panic!("unexpected error: {other}"),
    }
    let activity = fx.engine.get_activity(&act).unwrap().unwrap();
    assert_eq!(activity.status, ActivityStatus::Failed);
}

#[test]
fn test_complete_with_missing_output_rolls_back() {
    let fx = setup();
    let act = fx
        .engine
        .create_activity(&NewActivity::new("analysis", "a", &fx.agent))
        .unwrap();
    let err = fx
        .engine
        .complete_activity(&act, ActivityStatus::Completed, &["ent-missing".to_string()])
        .unwrap_err();
    assert!(err.is_not_found());

    let activity = fx.engine.get_activity(&act).unwrap().unwrap();
    assert_eq!(activity.status, ActivityStatus::Running);
    assert!(activity.ended_at.is_none());
}

#[test]
fn test_first_writer_wins_generated_by() {
    let fx = setup();
    let e = entity(&fx.engine, "shared");
    let a1 = fx
        .engine
        .create_activity(&NewActivity::new("transformation", "first", &fx.agent))
        .unwrap();
    let a2 = fx
        .engine
        .create_activity(&NewActivity::new("transformation", "second", &fx.agent))
        .unwrap();

    fx.engine
        .complete_activity(&a1, ActivityStatus::Completed, &[e.clone()])
        .unwrap();
    fx.engine
        .complete_activity(&a2, ActivityStatus::Completed, &[e.clone()])
        .unwrap();

    let entity = fx.engine.get_entity(&e).unwrap().unwrap();
    assert_eq!(entity.generated_by.as_deref(), Some(a1.as_str()));

    // Both activities still record the entity and both relations exist.
    let a2_row = fx.engine.get_activity(&a2).unwrap().unwrap();
    assert_eq!(a2_row.generated_entities, vec![e.clone()]);
    let generated = fx
        .engine
        .get_relations(&RelationFilter::of_type(RelationType::WAS_GENERATED_BY).from_source(&e))
        .unwrap();
    assert_eq!(generated.len(), 2);
}

#[test]
fn test_duplicate_used_ids_are_collapsed() {
    let fx = setup();
    let e1 = entity(&fx.engine, "e1");
    let act = fx
        .engine
        .create_activity(&NewActivity::new("analysis", "a", &fx.agent).using([&e1, &e1]))
        .unwrap();
    let activity = fx.engine.get_activity(&act).unwrap().unwrap();
    assert_eq!(activity.used_entities, vec![e1]);
}

#[test]
fn test_list_activities_filters_and_order() {
    let fx = setup();
    let other = fx
        .engine
        .create_agent(&NewAgent::new("model", "gpt").with_version("4"))
        .unwrap();
    let first = fx
        .engine
        .create_activity(&NewActivity::new("import", "load", &fx.agent).with_run_id("run-1"))
        .unwrap();
    let second = fx
        .engine
        .create_activity(&NewActivity::new("llm_call", "ask", &other).with_run_id("run-1"))
        .unwrap();
    let third = fx
        .engine
        .create_activity(&NewActivity::new("llm_call", "ask again", &other).with_run_id("run-2"))
        .unwrap();

    let all = fx
        .engine
        .list_activities(&ActivityFilter::default(), None)
        .unwrap();
    let ids: Vec<&str> = all.iter().map(|a| a.activity_id.as_str()).collect();
    assert_eq!(ids, vec![third.as_str(), second.as_str(), first.as_str()]);

    let run1 = fx
        .engine
        .list_activities(
            &ActivityFilter {
                run_id: Some("run-1".to_string()),
                ..Default::default()
            },
            None,
        )
        .unwrap();
    assert_eq!(run1.len(), 2);

    let llm = fx
        .engine
        .list_activities(
            &ActivityFilter {
                activity_type: Some("llm_call".into()),
                agent_id: Some(other.clone()),
                ..Default::default()
            },
            Some(1),
        )
        .unwrap();
    assert_eq!(llm.len(), 1);
    assert_eq!(llm[0].activity_id, third);
}

#[test]
fn test_activities_using_entity() {
    let fx = setup();
    let e1 = entity(&fx.engine, "e1");
    let e2 = entity(&fx.engine, "e2");
    let a1 = fx
        .engine
        .create_activity(&NewActivity::new("analysis", "a1", &fx.agent).using([&e1]))
        .unwrap();
    let a2 = fx
        .engine
        .create_activity(&NewActivity::new("analysis", "a2", &fx.agent).using([&e1, &e2]))
        .unwrap();

    let consumers: Vec<String> = fx
        .engine
        .activities_using_entity(&e1)
        .unwrap()
        .into_iter()
        .map(|a| a.activity_id)
        .collect();
    assert_eq!(consumers, vec![a1, a2.clone()]);

    let consumers = fx.engine.activities_using_entity(&e2).unwrap();
    assert_eq!(consumers.len(), 1);
    assert_eq!(consumers[0].activity_id, a2);
    assert_eq!(consumers[0].used_entities.len(), 2);
}

#[test]
fn test_delete_activity_clears_generated_by() {
    let fx = setup();
    let act = fx
        .engine
        .create_activity(&NewActivity::new("transformation", "t", &fx.agent))
        .unwrap();
    let out = entity(&fx.engine, "out");
    fx.engine
        .complete_activity(&act, ActivityStatus::Completed, &[out.clone()])
        .unwrap();

    assert!(fx.engine.delete_activity(&act).unwrap());
    assert!(!fx.engine.delete_activity(&act).unwrap());
    assert!(fx.engine.get_activity(&act).unwrap().is_none());

    let orphan = fx.engine.get_entity(&out).unwrap().unwrap();
    assert_eq!(orphan.generated_by, None);
}

#[test]
fn test_parameters_roundtrip() {
    let fx = setup();
    let mut params = lineage_core::Metadata::new();
    params.insert("temperature".into(), serde_json::json!(0.2));
    params.insert("model".into(), serde_json::json!("gpt-4"));
    let act = fx
        .engine
        .create_activity(&NewActivity::new("llm_call", "ask", &fx.agent).with_parameters(params.clone()))
        .unwrap();
    let activity = fx.engine.get_activity(&act).unwrap().unwrap();
    assert_eq!(activity.parameters, params);
    assert_eq!(activity.activity_type, "llm_call");
}
