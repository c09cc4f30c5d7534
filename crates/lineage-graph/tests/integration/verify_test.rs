//! Integration test: filesystem verification of single entities and chains.

use std::fs;
use std::path::Path;

use lineage_core::config::LineageConfig;
use lineage_core::models::{NewActivity, NewAgent, NewEntity};
use lineage_core::traits::{Blake3Hasher, ContentHasher};
use lineage_core::{ActivityStatus, ILineageStorage};
use lineage_graph::verify::NO_PATH_NOTE;
use lineage_graph::{LineageEngine, VerificationIssue};
use lineage_storage::StorageEngine;

fn engine() -> LineageEngine<StorageEngine> {
    LineageEngine::new(StorageEngine::open_in_memory(), LineageConfig::default())
}

fn file_entity(store: &StorageEngine, path: &Path, contents: &[u8]) -> String {
    fs::write(path, contents).unwrap();
    store
        .create_entity(
            &NewEntity::new("input_file", "file", Blake3Hasher::hash_bytes(contents))
                .with_path(path.to_string_lossy()),
        )
        .unwrap()
}

#[test]
fn test_verify_match_mutate_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    let engine = engine();
    let id = file_entity(engine.storage(), &path, b"original contents");

    let ok = engine.verify_entity(&id).unwrap();
    assert!(ok.verified);
    assert_eq!(ok.issue, None);
    assert_eq!(ok.current_hash, ok.stored_hash);

    fs::write(&path, b"tampered contents").unwrap();
    let mismatch = engine.verify_entity(&id).unwrap();
    assert!(!mismatch.verified);
    assert_eq!(mismatch.issue, Some(VerificationIssue::HashMismatch));
    assert_ne!(mismatch.current_hash, mismatch.stored_hash);
    assert!(mismatch.current_hash.is_some());

    fs::remove_file(&path).unwrap();
    let missing = engine.verify_entity(&id).unwrap();
    assert!(!missing.verified);
    assert_eq!(missing.issue, Some(VerificationIssue::FileMissing));
}

#[test]
fn test_verify_unknown_entity_is_a_value() {
    let engine = engine();
    let result = engine.verify_entity("ent-missing").unwrap();
    assert!(!result.verified);
    assert_eq!(result.issue, Some(VerificationIssue::NotFound));
    assert_eq!(result.stored_hash, None);
}

#[test]
fn test_entity_without_path_is_verified_with_note() {
    let engine = engine();
    let id = engine
        .storage()
        .create_entity(&NewEntity::new("prompt", "p", "h"))
        .unwrap();
    let result = engine.verify_entity(&id).unwrap();
    assert!(result.verified);
    assert_eq!(result.note.as_deref(), Some(NO_PATH_NOTE));
    assert_eq!(result.current_hash, None);
}

#[test]
fn test_unreadable_path_reports_io_issue() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine();
    // A directory exists but cannot be read as a file.
    let id = engine
        .storage()
        .create_entity(
            &NewEntity::new("input_file", "dir", "h").with_path(dir.path().to_string_lossy()),
        )
        .unwrap();
    let result = engine.verify_entity(&id).unwrap();
    assert!(!result.verified);
    assert!(matches!(result.issue, Some(VerificationIssue::Io { .. })));
}

#[cfg(unix)]
#[test]
fn test_failed_stat_reports_io_issue_not_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();
    let engine = engine();
    // stat fails with ENOTDIR, not ENOENT.
    let id = engine
        .storage()
        .create_entity(
            &NewEntity::new("input_file", "nested", "h")
                .with_path(file.join("child").to_string_lossy()),
        )
        .unwrap();
    let result = engine.verify_entity(&id).unwrap();
    assert!(!result.verified);
    match result.issue {
        Some(VerificationIssue::Io { message }) => assert!(!message.is_empty()),
        other => panic!("expected an io issue, got {other:?}"),
    }
}

#[test]
fn test_verify_chain_reports_invalid_ancestors() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine();
    let store = engine.storage();
    let agent = store.create_agent(&NewAgent::new("tool", "t")).unwrap();

    let input_path = dir.path().join("input.csv");
    let output_path = dir.path().join("output.csv");
    let input = file_entity(store, &input_path, b"a,b\n1,2\n");
    let act = store
        .create_activity(&NewActivity::new("transformation", "t", &agent).using([&input]))
        .unwrap();
    let output = file_entity(store, &output_path, b"a\n3\n");
    store
        .complete_activity(&act, ActivityStatus::Completed, &[output.clone()])
        .unwrap();

    let clean = engine.verify_chain(&output).unwrap();
    assert!(clean.verified);
    assert_eq!(clean.root_id, output);
    assert_eq!(clean.entities_checked, 2);
    assert_eq!(clean.entities_valid, 2);
    assert!(clean.entities_invalid.is_empty());

    fs::write(&input_path, b"changed").unwrap();
    let broken = engine.verify_chain(&output).unwrap();
    assert!(!broken.verified);
    assert_eq!(broken.entities_checked, 2);
    assert_eq!(broken.entities_valid, 1);
    assert_eq!(broken.entities_invalid, vec![input.clone()]);
    assert_eq!(broken.details.len(), 2);
}

#[test]
fn test_verify_chain_of_missing_root() {
    let engine = engine();
    let report = engine.verify_chain("ent-missing").unwrap();
    assert!(!report.verified);
    assert_eq!(report.entities_invalid, vec!["ent-missing".to_string()]);
}

struct FixedHasher;

impl ContentHasher for FixedHasher {
    fn hash_file(&self, _path: &Path) -> std::io::Result<String> {
        Ok("fixed".to_string())
    }
}

#[test]
fn test_custom_hasher_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("any.bin");
    fs::write(&path, b"whatever").unwrap();

    let engine = LineageEngine::with_hasher(
        StorageEngine::open_in_memory(),
        Box::new(FixedHasher),
        LineageConfig::default(),
    );
    let id = engine
        .storage()
        .create_entity(
            &NewEntity::new("input_file", "any", "fixed").with_path(path.to_string_lossy()),
        )
        .unwrap();
    assert!(engine.verify_entity(&id).unwrap().verified);
}
