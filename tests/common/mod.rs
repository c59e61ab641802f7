#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use taskboard::models::{Category, NewTask, Priority, Status, Task, TaskId, TimeFrame};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// A stored task with the given id, title and status, created 2025-06-01.
pub fn task(id: u64, title: &str, status: Status) -> Task {
    Task {
        id: TaskId::Confirmed(id),
        title: title.into(),
        description: None,
        category: Category::Work,
        priority: Priority::Medium,
        status,
        time_frame: TimeFrame::Weekly,
        progress: 0,
        estimated_hours: 2.0,
        actual_hours: 0.0,
        start_date: date(2025, 6, 1),
        end_date: date(2025, 6, 8),
        tags: Vec::new(),
        created_at: at(2025, 6, 1, 9, 0),
        updated_at: at(2025, 6, 1, 9, 0),
        version: 1,
    }
}

pub fn new_task(title: &str) -> NewTask {
    NewTask::new(title, date(2025, 6, 1), date(2025, 6, 8))
}

pub fn statuses(tasks: &[&Task]) -> Vec<Status> {
    tasks.iter().map(|t| t.status).collect()
}
