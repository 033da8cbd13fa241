use serde_json::{Value, json};
use std::fs;
use taskline_core::{TaskError, TaskManager, TaskUpdate, parse_due_date};
use tempfile::tempdir;

/// Walk the add/list/delete/add sequence and check the id collision reproduces.
#[test]
fn test_reference_session() {
    let dir = tempdir().unwrap();
    let mut m = TaskManager::open(dir.path().join("tasks.json")).unwrap();
    assert!(m.is_empty());

    m.add("Buy milk", "2%", parse_due_date("2024-05-01").unwrap(), None);
    let all: Vec<_> = m.list(None).collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].task_id, 1);
    assert_eq!(all[0].status, "Pending");

    m.add("Pay rent", "May", parse_due_date("2024-05-02").unwrap(), None);
    let ids: Vec<u64> = m.list(None).map(|t| t.task_id).collect();
    assert_eq!(ids, vec![1, 2]);

    m.delete(1);
    let all: Vec<_> = m.list(None).collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].task_id, 2);
    assert_eq!(all[0].title, "Pay rent");

    let added = m.add("Call bank", "Ref #1", parse_due_date("2024-05-03").unwrap(), None);
    assert_eq!(added.task_id, 2);
}

#[test]
fn test_save_then_reopen_preserves_order_and_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let mut m = TaskManager::open(&path).unwrap();
    m.add("Buy milk", "2%", parse_due_date("2024-05-01").unwrap(), None);
    m.add("Pay rent", "", parse_due_date("2024-05-02T18:45:00").unwrap(), Some("Blocked"));
    m.add("Call bank", "Ref #1", parse_due_date("2024-05-03 08:00").unwrap(), None);
    m.update(3, TaskUpdate::new().with_description("Ref #2"));
    m.save().unwrap();

    let reopened = TaskManager::open(&path).unwrap();
    assert_eq!(reopened.tasks(), m.tasks());
}

#[test]
fn test_empty_list_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    TaskManager::open(&path).unwrap().save().unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw.trim(), "[]");
    assert!(TaskManager::open(&path).unwrap().is_empty());
}

#[test]
fn test_store_file_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let mut m = TaskManager::open(&path).unwrap();
    m.add("Buy milk", "2%", parse_due_date("2024-05-01").unwrap(), None);
    m.save().unwrap();

    let v: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        v,
        json!([{
            "task_id": 1,
            "title": "Buy milk",
            "description": "2%",
            "due_date": "2024-05-01T00:00:00",
            "status": "Pending"
        }])
    );
}

#[test]
fn test_reads_store_written_by_other_tools() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(
        &path,
        r#"[{"task_id": 4, "title": "x", "description": "y", "due_date": "2024-05-01T00:00:00", "status": "Done"}]"#,
    )
    .unwrap();

    let m = TaskManager::open(&path).unwrap();
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(4).map(|t| t.status.as_str()), Some("Done"));
}

#[test]
fn test_missing_due_date_fails_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, r#"[{"task_id":1,"title":"x"}]"#).unwrap();

    let err = TaskManager::open(&path).unwrap_err();
    assert!(matches!(err, TaskError::MissingField { .. }));
    assert!(err.is_parse_error());
}

#[test]
fn test_missing_store_is_empty() {
    let dir = tempdir().unwrap();
    let m = TaskManager::open(dir.path().join("does-not-exist.json")).unwrap();
    assert!(m.is_empty());
    assert_eq!(m.list(None).count(), 0);
}

/// Rename over a directory fails for every user, root included.
#[test]
fn test_save_fails_when_store_path_became_a_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let mut m = TaskManager::open(&path).unwrap();
    m.add("a", "", parse_due_date("2024-05-01").unwrap(), None);

    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "x").unwrap();

    let err = m.save().unwrap_err();
    assert!(matches!(err, TaskError::Write { .. }));
    assert!(!err.is_parse_error());
    assert!(path.is_dir());
}

#[test]
fn test_save_fails_when_parent_is_a_file() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    let path = blocker.join("tasks.json");

    let mut m = TaskManager::open(&path).unwrap();
    m.add("a", "", parse_due_date("2024-05-01").unwrap(), None);

    fs::write(&blocker, "plain file").unwrap();

    let err = m.save().unwrap_err();
    assert!(matches!(err, TaskError::Write { .. }));
}

#[test]
fn test_fractional_due_date_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    let mut m = TaskManager::open(&path).unwrap();
    m.add("a", "", parse_due_date("2024-05-01T09:30:15.250").unwrap(), None);
    m.save().unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"2024-05-01T09:30:15.250000\""));
    assert_eq!(TaskManager::open(&path).unwrap().tasks(), m.tasks());
}
