mod common;

use chrono::Duration;
use common::{date, task};
use taskboard::models::{Priority, Status};
use taskboard::urgency::{compute_urgency, sort_by_urgency};

#[test]
fn test_urgency_calculation() {
    let today = date(2025, 6, 1);
    let mut t = task(1, "Test", Status::Todo);
    t.end_date = today + Duration::days(1);

    let urgency = compute_urgency(&t, today);
    // Urgency should be positive
    assert!(urgency > 0.0);
    assert!(urgency < 100.0);
}

#[test]
fn test_urgency_overdue() {
    let today = date(2025, 6, 10);
    let t = task(1, "Test", Status::InProgress);

    let urgency = compute_urgency(&t, today);
    // Should be very high because it's overdue (base 100 + ...)
    assert!(urgency > 100.0);
}

#[test]
fn test_finished_tasks_have_no_urgency() {
    let today = date(2025, 6, 10);
    assert_eq!(compute_urgency(&task(1, "a", Status::Done), today), -1.0);
    assert_eq!(compute_urgency(&task(2, "b", Status::Cancelled), today), -1.0);
}

#[test]
fn test_priority_raises_urgency() {
    let today = date(2025, 6, 1);
    let mut low = task(1, "low", Status::Todo);
    low.priority = Priority::Low;
    let mut urgent = task(2, "urgent", Status::Todo);
    urgent.priority = Priority::Urgent;

    assert!(compute_urgency(&urgent, today) > compute_urgency(&low, today));
}

#[test]
fn test_sort_by_urgency() {
    let today = date(2025, 6, 1);
    let done = task(1, "done", Status::Done);
    let mut later = task(2, "later", Status::Todo);
    later.end_date = today + Duration::days(30);
    let mut soon = task(3, "soon", Status::Todo);
    soon.end_date = today + Duration::days(2);
    let mut tasks = vec![done, later, soon];

    sort_by_urgency(&mut tasks, today);
    let order: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(order, vec!["soon", "later", "done"]);
}
