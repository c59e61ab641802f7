mod common;

use tempfile::TempDir;
use taskboard::models::{Category, TaskId};
use taskboard::storage::Store;
use taskboard::timer::TimerPolicy;
use taskboard::tui::app::{App, InputMode};

fn temp_app() -> (TempDir, Store, App) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("tasks.json"));
    let app = App::new(store.clone(), TimerPolicy::default()).unwrap();
    (dir, store, app)
}

/// Types `text` into the input line and presses Enter.
fn enter(app: &mut App, text: &str) {
    for c in text.chars() {
        app.push_char(c);
    }
    app.handle_input();
}

#[test]
fn test_add_wizard_keeps_the_stored_copy() {
    let (_dir, store, mut app) = temp_app();

    app.start_add();
    enter(&mut app, "Plan sprint");
    enter(&mut app, "education");
    enter(&mut app, "");
    enter(&mut app, "2025-06-01");
    enter(&mut app, "2025-06-08");
    enter(&mut app, "2");

    assert_eq!(app.input_mode, InputMode::Normal);
    let stored = store.load().unwrap();
    assert_eq!(stored.len(), 1);
    let task = stored.get(TaskId::Confirmed(1)).unwrap();
    assert_eq!(task.category, Category::Education);
    assert_eq!(task.estimated_hours, 2.0);
    // No pending copy lingers and the timestamps match what was written.
    assert_eq!(app.board, stored);
    assert_eq!(app.visible, vec![TaskId::Confirmed(1)]);
}

#[test]
fn test_add_wizard_rejects_backwards_dates() {
    let (_dir, store, mut app) = temp_app();

    app.start_add();
    enter(&mut app, "Backwards");
    enter(&mut app, "");
    enter(&mut app, "");
    enter(&mut app, "2025-06-08");
    enter(&mut app, "2025-06-01");
    enter(&mut app, "");

    assert!(app.board.is_empty());
    assert!(app.message.as_deref().unwrap_or_default().starts_with("Error:"));
    assert!(store.load().unwrap().is_empty());
}
