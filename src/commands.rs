use std::io::{self, Write};
use chrono::{Local, Utc};
use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::error::Result;
use crate::filter::TaskQuery;
use crate::models::{NewTask, Priority, Status, Task, TaskId, TaskPatch};
use crate::stats::{build_report, is_overdue};
use crate::storage::Store;
use crate::timer::TimerPolicy;
use crate::urgency::{compute_urgency, sort_by_urgency};

/// Ordering of the `list` output.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Order of creation.
    #[default]
    Created,
    /// Most urgent first.
    Urgency,
    /// Urgent priority first.
    Priority,
    /// Earliest end date first.
    EndDate,
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Todo => Color::Yellow,
        Status::InProgress => Color::Cyan,
        Status::Done => Color::Green,
        Status::Cancelled => Color::Grey,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Reset,
        Priority::High => Color::Yellow,
        Priority::Urgent => Color::Red,
    }
}

fn bold(s: &str) -> Cell {
    Cell::new(s).add_attribute(Attribute::Bold)
}

/// Asks a yes/no question on stdin. Anything but `y` means no.
fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("y")
}

/// Creates a task and returns its id.
pub fn cmd_add(store: &Store, new: NewTask, silent: bool) -> Result<TaskId> {
    let task = store.create_task(new)?;
    if !silent { println!("Task added (id = {})", task.id); }
    Ok(task.id)
}

/// Lists tasks matching `query` in a formatted table.
pub fn cmd_list(store: &Store, query: &TaskQuery, sort: SortKey) -> Result<()> {
    let all = store.list_tasks()?;
    let mut tasks: Vec<Task> = query.apply(&all).into_iter().cloned().collect();
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    match sort {
        SortKey::Created => {}
        SortKey::Urgency => sort_by_urgency(&mut tasks, today),
        SortKey::Priority => tasks.sort_by(|a, b| b.priority.cmp(&a.priority)),
        SortKey::EndDate => tasks.sort_by_key(|t| t.end_date),
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            bold("ID"),
            bold("Title"),
            bold("Category"),
            bold("Priority"),
            bold("Status"),
            bold("Progress"),
            bold("Hours"),
            bold("End"),
            bold("Urg"),
        ]);

    for t in &tasks {
        let overdue = is_overdue(t, today);
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.category),
            Cell::new(t.priority).fg(priority_color(t.priority)),
            Cell::new(t.status).fg(status_color(t.status)),
            Cell::new(format!("{}%", t.progress)),
            Cell::new(format!("{:.1}/{:.1}", t.actual_hours, t.estimated_hours)),
            Cell::new(t.end_date).fg(if overdue { Color::Red } else { Color::Reset }),
            Cell::new(format!("{:.1}", compute_urgency(t, today))),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Prints every field of one task.
pub fn cmd_show(store: &Store, id: TaskId) -> Result<()> {
    let board = store.load()?;
    let t = board.get(id).ok_or(crate::error::Error::NotFound(id))?;
    let running = board.active_timer().filter(|timer| timer.task_id == id);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let rows: Vec<(&str, String)> = vec![
        ("ID", t.id.to_string()),
        ("Title", t.title.clone()),
        ("Description", t.description.clone().unwrap_or_else(|| "-".into())),
        ("Category", t.category.to_string()),
        ("Priority", t.priority.to_string()),
        ("Status", t.status.to_string()),
        ("Time frame", t.time_frame.to_string()),
        ("Progress", format!("{}%", t.progress)),
        ("Estimated", format!("{:.2}h", t.estimated_hours)),
        ("Actual", format!("{:.2}h", t.actual_hours)),
        ("Dates", format!("{} → {}", t.start_date, t.end_date)),
        ("Tags", if t.tags.is_empty() { "-".into() } else { t.tags.join(", ") }),
        ("Created", t.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()),
        ("Version", t.version.to_string()),
        ("Timer", match running {
            Some(timer) => format!("running since {}", timer.started_at.with_timezone(&Local).format("%H:%M")),
            None => "stopped".into(),
        }),
    ];
    for (k, v) in rows {
        table.add_row(vec![bold(k), Cell::new(v)]);
    }
    println!("{table}");
    Ok(())
}

/// Applies a partial update to a task.
pub fn cmd_edit(store: &Store, id: TaskId, patch: TaskPatch, expected_version: Option<u64>, silent: bool) -> Result<()> {
    let task = store.update_task(id, &patch, expected_version)?;
    if !silent {
        if patch.is_empty() {
            println!("Nothing to change for task {}.", id);
        } else {
            println!("Task {} updated (version {}).", id, task.version);
        }
    }
    Ok(())
}

/// Removes a task. A task that is already gone is reported, not an error.
pub fn cmd_remove(store: &Store, id: TaskId, silent: bool) -> Result<bool> {
    let removed = store.delete_task(id)?;
    if !silent {
        if removed { println!("Task {} removed.", id); } else { println!("Task {} was already gone.", id); }
    }
    Ok(removed)
}

/// Removes every listed task, ignoring unknown ids.
pub fn cmd_bulk_remove(store: &Store, ids: &[TaskId], silent: bool) -> Result<usize> {
    let removed = store.bulk_delete_tasks(ids)?;
    if !silent { println!("{} of {} task(s) removed.", removed, ids.len()); }
    Ok(removed)
}

/// Removes every done task after one confirmation, unless `force`.
pub fn cmd_cleanup_completed(store: &Store, force: bool, silent: bool) -> Result<usize> {
    if !force && !confirm("Delete all completed tasks? This cannot be undone.") {
        println!("Aborted.");
        return Ok(0);
    }
    let removed = store.cleanup_completed_tasks()?;
    if !silent { println!("{} completed task(s) removed.", removed); }
    Ok(removed)
}

/// Removes unfinished tasks created at least `days` days ago.
pub fn cmd_cleanup_old(store: &Store, days: u32, force: bool, silent: bool) -> Result<usize> {
    if !force && !confirm(&format!("Delete all unfinished tasks older than {} days? This cannot be undone.", days)) {
        println!("Aborted.");
        return Ok(0);
    }
    let removed = store.cleanup_old_tasks(days)?;
    if !silent { println!("{} old task(s) removed.", removed); }
    Ok(removed)
}

/// Moves a task to the next status of the todo → in-progress → done cycle.
pub fn cmd_advance(store: &Store, id: TaskId, silent: bool) -> Result<Status> {
    let status = store.advance_status(id)?;
    if !silent { println!("Task {} is now {}.", id, status); }
    Ok(status)
}

pub fn cmd_timer_start(store: &Store, id: TaskId, silent: bool) -> Result<()> {
    let displaced = store.start_timer(id)?;
    if !silent {
        if let Some(prev) = displaced {
            println!("Timer on task {} discarded.", prev);
        }
        println!("Timer started on task {}.", id);
    }
    Ok(())
}

/// Stops the running timer and returns the hours logged.
pub fn cmd_timer_stop(store: &Store, id: TaskId, policy: TimerPolicy, silent: bool) -> Result<f64> {
    let hours = store.stop_timer(id, policy)?;
    if !silent { println!("Timer stopped on task {}: {:.2}h logged.", id, hours); }
    Ok(hours)
}

pub fn cmd_timer_status(store: &Store) -> Result<()> {
    let board = store.load()?;
    match board.active_timer() {
        Some(timer) => {
            let title = board.get(timer.task_id).map(|t| t.title.as_str()).unwrap_or("?");
            let minutes = (Utc::now() - timer.started_at).num_minutes().max(0);
            println!("Timer running on task {} ({}) for {} min.", timer.task_id, title, minutes);
        }
        None => println!("No timer running."),
    }
    Ok(())
}

/// Prints the dashboard counters.
pub fn cmd_stats(store: &Store) -> Result<()> {
    let stats = store.load()?.stats();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Total", "Todo", "In progress", "Done", "Completion"]);
    table.add_row(vec![
        stats.total.to_string(),
        stats.todo.to_string(),
        stats.in_progress.to_string(),
        stats.completed.to_string(),
        format!("{}%", stats.completion_rate),
    ]);
    println!("{table}");
    Ok(())
}

/// Prints the analytics report: breakdowns by category and priority, hours
/// and overdue tasks.
pub fn cmd_report(store: &Store) -> Result<()> {
    let tasks = store.list_tasks()?;
    let report = build_report(&tasks, Local::now().date_naive());

    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    summary.add_row(vec!["Tasks".to_string(), report.stats.total.to_string()]);
    summary.add_row(vec!["Completed".to_string(), report.stats.completed.to_string()]);
    summary.add_row(vec!["Completion rate".to_string(), format!("{}%", report.stats.completion_rate)]);
    summary.add_row(vec!["Cancelled".to_string(), report.cancelled.to_string()]);
    summary.add_row(vec!["Overdue".to_string(), report.overdue.to_string()]);
    summary.add_row(vec!["Estimated hours".to_string(), format!("{:.1}", report.estimated_hours)]);
    summary.add_row(vec!["Actual hours".to_string(), format!("{:.1}", report.actual_hours)]);
    println!("{summary}");

    let mut breakdown = Table::new();
    breakdown.load_preset(UTF8_FULL).set_header(vec!["Category", "Tasks"]);
    for (category, n) in &report.by_category {
        breakdown.add_row(vec![category.to_string(), n.to_string()]);
    }
    println!("{breakdown}");

    let mut priorities = Table::new();
    priorities.load_preset(UTF8_FULL).set_header(vec!["Priority", "Tasks"]);
    for (priority, n) in report.by_priority.iter().rev() {
        priorities.add_row(vec![
            Cell::new(priority).fg(priority_color(*priority)),
            Cell::new(n),
        ]);
    }
    println!("{priorities}");
    Ok(())
}
