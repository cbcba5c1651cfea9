use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;
use weaving_core::{PatternStore, PatternValidationError, StoreConfig, StoreError};

fn temp_store() -> (TempDir, PatternStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = PatternStore::new(StoreConfig::new(dir.path().join("weaving_program.db")));
    store.initialize().unwrap();
    (dir, store)
}

fn count_rows(path: &Path, table: &str, pattern_id: i64) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE pattern_id = ?1;"),
        [pattern_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn initialize_creates_file_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weaving_program.db");
    let store = PatternStore::open(&path);

    store.initialize().unwrap();
    assert!(path.exists());
    let id = store.add_pattern("Twill", 4, 6).unwrap();
    store.add_threading(id, 1, 1).unwrap();

    let before = store.list_patterns().unwrap();
    store.initialize().unwrap();
    store.initialize().unwrap();

    assert_eq!(store.list_patterns().unwrap(), before);
    assert_eq!(store.list_threading(id).unwrap().len(), 1);
}

#[test]
fn add_pattern_then_list_roundtrips() {
    let (_dir, store) = temp_store();
    let called_at = Utc::now().timestamp();

    let id = store.add_pattern("Twill", 4, 6).unwrap();

    let patterns = store.list_patterns().unwrap();
    assert_eq!(patterns.len(), 1);
    let pattern = &patterns[0];
    assert_eq!(pattern.id, id);
    assert!(pattern.id > 0);
    assert_eq!(pattern.name, "Twill");
    assert_eq!(pattern.shafts, 4);
    assert_eq!(pattern.treadles, 6);
    // CURRENT_TIMESTAMP has second precision.
    assert!(pattern.created_at.timestamp() >= called_at);
}

#[test]
fn delete_pattern_cascades_to_structural_rows() {
    let (dir, store) = temp_store();
    let path = dir.path().join("weaving_program.db");

    let id = store.add_pattern("Overshot", 4, 4).unwrap();
    let keep = store.add_pattern("Keep", 2, 2).unwrap();
    store.add_threading(id, 1, 1).unwrap();
    store.add_treadling(id, 1, 2).unwrap();
    store.add_tieup(id, 1, 3).unwrap();
    store.add_threading(keep, 1, 1).unwrap();

    store.delete_pattern(id).unwrap();

    assert!(store.get_pattern(id).unwrap().is_none());
    for table in ["threading", "treadling", "tieups"] {
        assert_eq!(count_rows(&path, table, id), 0, "{table} kept orphan rows");
    }
    assert_eq!(count_rows(&path, "threading", keep), 1);
}

#[test]
fn update_and_delete_on_missing_id_are_silent_noops() {
    let (_dir, store) = temp_store();
    store.add_pattern("Plain Weave", 2, 2).unwrap();
    let before = store.list_patterns().unwrap();

    store.update_pattern(9999, "X", 1, 1).unwrap();
    store.delete_pattern(9999).unwrap();

    assert_eq!(store.list_patterns().unwrap(), before);
}

#[test]
fn update_pattern_overwrites_fields() {
    let (_dir, store) = temp_store();
    let id = store.add_pattern("Draft", 4, 4).unwrap();
    let created_at = store.get_pattern(id).unwrap().unwrap().created_at;

    store.update_pattern(id, "Broken Twill", 4, 8).unwrap();

    let pattern = store.get_pattern(id).unwrap().unwrap();
    assert_eq!(pattern.name, "Broken Twill");
    assert_eq!(pattern.shafts, 4);
    assert_eq!(pattern.treadles, 8);
    assert_eq!(pattern.created_at, created_at);
}

#[test]
fn repeated_structural_appends_are_not_deduplicated() {
    let (_dir, store) = temp_store();
    let id = store.add_pattern("Twill", 4, 4).unwrap();

    let first = store.add_threading(id, 3, 2).unwrap();
    let second = store.add_threading(id, 3, 2).unwrap();
    store.add_treadling(id, 3, 2).unwrap();
    store.add_treadling(id, 3, 2).unwrap();
    store.add_tieup(id, 3, 2).unwrap();
    store.add_tieup(id, 3, 2).unwrap();

    assert_ne!(first, second);
    let threading = store.list_threading(id).unwrap();
    assert_eq!(threading.len(), 2);
    assert_ne!(threading[0].id, threading[1].id);
    assert_eq!(store.list_treadling(id).unwrap().len(), 2);
    assert_eq!(store.list_tieups(id).unwrap().len(), 2);
}

#[test]
fn plain_weave_end_to_end() {
    let (_dir, store) = temp_store();

    let id = store.add_pattern("Plain Weave", 2, 2).unwrap();
    assert_eq!(id, 1);
    store.add_threading(1, 1, 1).unwrap();
    store.add_threading(1, 2, 2).unwrap();
    store.add_tieup(1, 1, 1).unwrap();
    store.add_tieup(1, 2, 2).unwrap();

    let patterns = store.list_patterns().unwrap();
    assert_eq!(patterns.len(), 1);
    assert_eq!(patterns[0].id, 1);

    let threading: Vec<_> = store
        .list_threading(1)
        .unwrap()
        .into_iter()
        .map(|entry| (entry.pattern_id, entry.thread_number, entry.shaft))
        .collect();
    assert_eq!(threading, vec![(1, 1, 1), (1, 2, 2)]);

    let tieup: Vec<_> = store
        .list_tieups(1)
        .unwrap()
        .into_iter()
        .map(|entry| (entry.pattern_id, entry.treadle, entry.shaft))
        .collect();
    assert_eq!(tieup, vec![(1, 1, 1), (1, 2, 2)]);
}

#[test]
fn load_draft_collects_all_structural_rows() {
    let (_dir, store) = temp_store();
    let id = store.add_pattern("Goose Eye", 4, 4).unwrap();
    store.add_threading(id, 1, 1).unwrap();
    store.add_treadling(id, 1, 4).unwrap();
    store.add_tieup(id, 4, 1).unwrap();
    store.add_tieup(id, 4, 2).unwrap();

    let draft = store.load_draft(id).unwrap().unwrap();
    assert_eq!(draft.pattern.name, "Goose Eye");
    assert_eq!(draft.threading.len(), 1);
    assert_eq!(draft.treadling[0].shaft, 4);
    assert_eq!(draft.tieup.len(), 2);

    assert!(store.load_draft(id + 1).unwrap().is_none());
}

#[test]
fn structural_row_for_unknown_pattern_is_rejected() {
    let (_dir, store) = temp_store();

    let err = store.add_threading(5, 1, 1).unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    let err = store.add_tieup(5, 1, 1).unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    assert!(store.list_threading(5).unwrap().is_empty());
}

#[test]
fn invalid_pattern_input_is_rejected_before_write() {
    let (_dir, store) = temp_store();

    let err = store.add_pattern("  ", 4, 4).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(PatternValidationError::EmptyName)
    ));
    let err = store.add_pattern("Twill", 4, 0).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(PatternValidationError::NonPositiveCount {
            field: "treadles",
            ..
        })
    ));
    assert!(store.list_patterns().unwrap().is_empty());
}

#[test]
fn unopenable_location_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let store = PatternStore::open(dir.path().join("missing").join("weaving.db"));

    let err = store.initialize().unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable(_)));
    assert!(err.to_string().contains("weaving.db"), "{err}");
    assert!(store.list_patterns().is_err());
}

#[test]
fn stores_on_separate_files_are_isolated() {
    let (_first_dir, first) = temp_store();
    let (_second_dir, second) = temp_store();

    first.add_pattern("Only here", 2, 2).unwrap();

    assert_eq!(first.list_patterns().unwrap().len(), 1);
    assert!(second.list_patterns().unwrap().is_empty());
}

#[test]
fn concurrent_writers_on_one_file_all_land() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    PatternStore::open(&path).initialize().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = PatternStore::open(&path);
            std::thread::spawn(move || {
                for pick in 0..5 {
                    store
                        .add_pattern(&format!("worker-{worker}-{pick}"), 2, 2)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let patterns = PatternStore::open(&path).list_patterns().unwrap();
    assert_eq!(patterns.len(), 20);
}

#[test]
fn pattern_serializes_with_flat_fields() {
    let (_dir, store) = temp_store();
    let id = store.add_pattern("Twill", 4, 6).unwrap();
    let pattern = store.get_pattern(id).unwrap().unwrap();

    let json = serde_json::to_value(&pattern).unwrap();
    assert_eq!(json["id"], id);
    assert_eq!(json["name"], "Twill");
    assert_eq!(json["shafts"], 4);
    assert!(json["created_at"].is_string());
}

#[test]
fn malformed_legacy_row_is_reported_as_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weaving_program.db");
    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE patterns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                shafts INTEGER NOT NULL,
                treadles INTEGER NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO patterns (name, shafts, treadles) VALUES ('Twill', 4, 6);
            INSERT INTO patterns (name, shafts, treadles) VALUES ('Bad', '4x', 0);",
        )
        .unwrap();
    drop(legacy);

    let store = PatternStore::open(&path);
    match store.list_patterns().unwrap_err() {
        StoreError::InvalidData(message) => {
            assert!(message.contains("pattern 2"), "{message}");
            assert!(message.contains("patterns.shafts"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.get_pattern(1).unwrap().unwrap().name, "Twill");
}
