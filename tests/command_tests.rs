mod common;

use std::fs;
use common::new_task;
use tempfile::TempDir;
use taskboard::commands::*;
use taskboard::error::Error;
use taskboard::filter::TaskQuery;
use taskboard::models::{Status, TaskId, TaskPatch};
use taskboard::storage::Store;
use taskboard::timer::TimerPolicy;

/// A store in a fresh temporary directory. Keep the `TempDir` alive for the
/// duration of the test.
fn temp_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("nested").join("tasks.json"));
    (dir, store)
}

#[test]
fn test_missing_document_loads_empty() {
    let (_dir, store) = temp_store();
    assert!(store.load().unwrap().is_empty());
    assert!(store.list_tasks().unwrap().is_empty());
}

#[test]
fn test_add_and_list() {
    let (_dir, store) = temp_store();
    let id = cmd_add(&store, new_task("Test Task"), true).unwrap();

    assert_eq!(id, TaskId::Confirmed(1));
    let tasks = store.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Test Task");
    assert!(store.path().exists());
    cmd_list(&store, &TaskQuery::default(), SortKey::Urgency).unwrap();
}

#[test]
fn test_document_round_trips() {
    let (_dir, store) = temp_store();
    cmd_add(&store, new_task("One"), true).unwrap();
    let id = cmd_add(&store, new_task("Two"), true).unwrap();
    cmd_timer_start(&store, id, true).unwrap();

    let before = store.load().unwrap();
    store.save(&before).unwrap();
    assert_eq!(store.load().unwrap(), before);
    assert_eq!(before.active_timer().unwrap().task_id, id);

    let raw = fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\"confirmed\": 2"));
    assert!(raw.contains("\"status\": \"todo\""));
}

#[test]
fn test_invalid_add_writes_nothing() {
    let (_dir, store) = temp_store();
    let mut bad = new_task("Backwards");
    bad.end_date = bad.start_date;

    assert!(matches!(cmd_add(&store, bad, true), Err(Error::Validation(_))));
    assert!(!store.path().exists());
}

#[test]
fn test_failed_update_leaves_document_unchanged() {
    let (_dir, store) = temp_store();
    let id = cmd_add(&store, new_task("Keep me"), true).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    let patch = TaskPatch { title: Some("Changed".into()), ..TaskPatch::default() };
    let err = cmd_edit(&store, id, patch, Some(5), true).unwrap_err();

    assert!(matches!(err, Error::VersionConflict { .. }));
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn test_edit_with_current_version() {
    let (_dir, store) = temp_store();
    let id = cmd_add(&store, new_task("Draft"), true).unwrap();
    let patch = TaskPatch { progress: Some(60), ..TaskPatch::default() };

    cmd_edit(&store, id, patch, Some(1), true).unwrap();

    let task = store.list_tasks().unwrap().remove(0);
    assert_eq!(task.progress, 60);
    assert_eq!(task.version, 2);
}

#[test]
fn test_advance_is_persisted() {
    let (_dir, store) = temp_store();
    let id = cmd_add(&store, new_task("Cycle"), true).unwrap();

    assert_eq!(cmd_advance(&store, id, true).unwrap(), Status::InProgress);
    assert_eq!(cmd_advance(&store, id, true).unwrap(), Status::Done);

    let task = store.list_tasks().unwrap().remove(0);
    assert_eq!(task.status, Status::Done);
    assert_eq!(task.progress, 100);
}

#[test]
fn test_timer_through_store() {
    let (_dir, store) = temp_store();
    let id = cmd_add(&store, new_task("Timed"), true).unwrap();

    cmd_timer_start(&store, id, true).unwrap();
    let hours = cmd_timer_stop(&store, id, TimerPolicy::ManualIncrement { hours: 0.5 }, true).unwrap();

    assert_eq!(hours, 0.5);
    assert_eq!(store.list_tasks().unwrap()[0].actual_hours, 0.5);
    assert!(store.load().unwrap().active_timer().is_none());
    assert!(matches!(
        cmd_timer_stop(&store, id, TimerPolicy::default(), true),
        Err(Error::TimerNotRunning(_))
    ));
}

#[test]
fn test_remove_and_bulk_remove() {
    let (_dir, store) = temp_store();
    let ids: Vec<TaskId> = (0..5)
        .map(|i| cmd_add(&store, new_task(&format!("Task {}", i)), true).unwrap())
        .collect();

    assert!(cmd_remove(&store, ids[0], true).unwrap());
    assert!(!cmd_remove(&store, ids[0], true).unwrap());

    let removed = cmd_bulk_remove(&store, &[ids[1], ids[2], TaskId::Confirmed(99)], true).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.list_tasks().unwrap().len(), 2);
}

#[test]
fn test_cleanup_commands() {
    let (_dir, store) = temp_store();
    let done = cmd_add(&store, new_task("Finished"), true).unwrap();
    cmd_add(&store, new_task("Fresh"), true).unwrap();
    cmd_advance(&store, done, true).unwrap();
    cmd_advance(&store, done, true).unwrap();

    assert_eq!(cmd_cleanup_completed(&store, true, true).unwrap(), 1);
    // Everything left was created moments ago.
    assert_eq!(cmd_cleanup_old(&store, 1, true, true).unwrap(), 0);
    assert_eq!(cmd_cleanup_old(&store, 0, true, true).unwrap(), 1);
    assert!(store.list_tasks().unwrap().is_empty());
}

#[test]
fn test_malformed_document_is_an_error() {
    let (_dir, store) = temp_store();
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "{ not json").unwrap();

    assert!(matches!(store.load(), Err(Error::Json { .. })));
    // Nothing is overwritten on failure.
    assert!(cmd_add(&store, new_task("x"), true).is_err());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
}

#[test]
fn test_unknown_status_in_document_is_rejected() {
    let (_dir, store) = temp_store();
    cmd_add(&store, new_task("x"), true).unwrap();
    let raw = fs::read_to_string(store.path()).unwrap().replace("\"todo\"", "\"archived\"");
    fs::write(store.path(), raw).unwrap();

    assert!(matches!(store.load(), Err(Error::Json { .. })));
}

#[test]
fn test_delete_document() {
    let (_dir, store) = temp_store();
    cmd_add(&store, new_task("x"), true).unwrap();
    store.delete().unwrap();
    store.delete().unwrap();
    assert!(store.load().unwrap().is_empty());
}

fn entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_save_replaces_document_without_leftovers() {
    let (_dir, store) = temp_store();
    cmd_add(&store, new_task("One"), true).unwrap();
    cmd_add(&store, new_task("Two"), true).unwrap();

    assert_eq!(entries(store.path().parent().unwrap()), vec!["tasks.json"]);
    assert_eq!(store.list_tasks().unwrap().len(), 2);
}

#[test]
fn test_failed_save_leaves_no_partial_file() {
    let (_dir, store) = temp_store();
    cmd_add(&store, new_task("Keep me"), true).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();
    let board = store.load().unwrap();

    // A non-empty directory sitting on the target path cannot be replaced.
    let parent = store.path().parent().unwrap();
    let blocked = Store::new(parent.join("blocked"));
    fs::create_dir_all(blocked.path().join("inner")).unwrap();

    assert!(matches!(blocked.save(&board), Err(Error::Io { .. })));
    assert_eq!(entries(parent), vec!["blocked", "tasks.json"]);
    assert_eq!(entries(blocked.path()), vec!["inner"]);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}
