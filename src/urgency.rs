use chrono::NaiveDate;
use crate::models::{Priority, Status, Task};

fn priority_weight(priority: Priority) -> f64 {
    match priority {
        Priority::Low => 1.0,
        Priority::Medium => 2.0,
        Priority::High => 4.0,
        Priority::Urgent => 8.0,
    }
}

/// Calculates the urgency score for a given task as of `today`.
///
/// The score is based on:
/// - **End Date**: Closer deadlines yield higher scores. Overdue tasks get a significant boost.
/// - **Priority**: Scales the deadline term and adds a small base.
/// - **Remaining Effort**: Estimated hours not yet logged slightly increase urgency.
///
/// # Returns
/// - `-1.0` if the task is done or cancelled.
/// - A positive float representing urgency (higher is more urgent).
pub fn compute_urgency(task: &Task, today: NaiveDate) -> f64 {
    if matches!(task.status, Status::Done | Status::Cancelled) {
        return -1.0;
    }
    let weight = priority_weight(task.priority);
    let remaining = (task.estimated_hours - task.actual_hours).max(0.0);
    let days_left = (task.end_date - today).num_days();
    let base = if days_left <= 0 {
        // overdue or due today
        100.0 + weight * 5.0 + remaining + (days_left.abs() as f64 * 2.0)
    } else {
        weight + (1.0 / (days_left as f64)) * 10.0 * weight * (1.0 + remaining / 8.0)
    };
    if base.is_finite() { base } else { 0.0 }
}

/// Sorts most urgent first. Ties keep their original order.
pub fn sort_by_urgency(tasks: &mut [Task], today: NaiveDate) {
    tasks.sort_by(|a, b| compute_urgency(b, today).total_cmp(&compute_urgency(a, today)));
}
