use chrono::NaiveDate;
use crate::models::{Category, Priority, Status, Task};

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
    /// Rounded percentage of completed tasks, 0 for an empty collection.
    pub completion_rate: u32,
}

/// Counts the collection in one pass.
pub fn aggregate_stats(tasks: &[Task]) -> Stats {
    let mut stats = Stats { total: tasks.len(), ..Stats::default() };
    for t in tasks {
        match t.status {
            Status::Done => stats.completed += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Todo => stats.todo += 1,
            Status::Cancelled => {}
        }
    }
    if stats.total > 0 {
        stats.completion_rate = (100.0 * stats.completed as f64 / stats.total as f64).round() as u32;
    }
    stats
}

/// The analytics behind the `report` command.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub stats: Stats,
    pub cancelled: usize,
    pub overdue: usize,
    /// Every category in declaration order, zero counts included.
    pub by_category: Vec<(Category, usize)>,
    /// Every priority from low to urgent, zero counts included.
    pub by_priority: Vec<(Priority, usize)>,
    pub estimated_hours: f64,
    pub actual_hours: f64,
}

/// A task is overdue when its end date has passed and it is still open.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.end_date < today && !matches!(task.status, Status::Done | Status::Cancelled)
}

pub fn build_report(tasks: &[Task], today: NaiveDate) -> Report {
    let by_category = Category::ALL
        .iter()
        .map(|c| (*c, tasks.iter().filter(|t| t.category == *c).count()))
        .collect();
    let by_priority = Priority::ALL
        .iter()
        .map(|p| (*p, tasks.iter().filter(|t| t.priority == *p).count()))
        .collect();

    Report {
        stats: aggregate_stats(tasks),
        cancelled: tasks.iter().filter(|t| t.status == Status::Cancelled).count(),
        overdue: tasks.iter().filter(|t| is_overdue(t, today)).count(),
        by_category,
        by_priority,
        estimated_hours: tasks.iter().map(|t| t.estimated_hours).sum(),
        actual_hours: tasks.iter().map(|t| t.actual_hours).sum(),
    }
}
