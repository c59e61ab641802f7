use std::fmt;
use std::str::FromStr;
use clap::ValueEnum;
use crate::error::Error;
use crate::models::{Category, Priority, Status, Task};

/// The status selector of the task list.
///
/// This is a closed set; anything else fails to parse instead of quietly
/// matching nothing.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Todo,
    InProgress,
    Done,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Todo,
        StatusFilter::InProgress,
        StatusFilter::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Todo => "todo",
            StatusFilter::InProgress => "in-progress",
            StatusFilter::Done => "done",
        }
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Todo => status == Status::Todo,
            StatusFilter::InProgress => status == Status::InProgress,
            StatusFilter::Done => status == Status::Done,
        }
    }

    /// The next selector, wrapping around. Used by the dashboard's filter key.
    pub fn next(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Todo,
            StatusFilter::Todo => StatusFilter::InProgress,
            StatusFilter::InProgress => StatusFilter::Done,
            StatusFilter::Done => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StatusFilter::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| Error::Parse { what: "status filter", value: s.to_string() })
    }
}

/// Case-insensitive substring match on the title. An empty term matches all.
pub fn title_matches(task: &Task, search: &str) -> bool {
    search.is_empty() || task.title.to_lowercase().contains(&search.to_lowercase())
}

/// Keeps the tasks whose status passes `filter` and whose title contains
/// `search`, in their original order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: StatusFilter, search: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| filter.matches(t.status) && title_matches(t, search))
        .collect()
}

/// The sidebar query: status filter and search, optionally narrowed to one
/// category and/or priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub status: StatusFilter,
    pub search: String,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task.status)
            && title_matches(task, &self.search)
            && self.category.map_or(true, |c| task.category == c)
            && self.priority.map_or(true, |p| task.priority == p)
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}
