use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use crate::error::{Error, ValidationError};

/// Implements `Display`/`FromStr` for a plain enum in terms of its `as_str` and `ALL`.
macro_rules! text_enum {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| Error::Parse { what: $what, value: s.to_string() })
            }
        }
    };
}

/// Identity of a task.
///
/// A task created locally before the store has acknowledged it is `Pending`,
/// keyed by the epoch-millisecond timestamp of its creation. Once the store
/// assigns an id it becomes `Confirmed`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskId {
    Pending(i64),
    Confirmed(u64),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Pending(local) => write!(f, "local-{}", local),
            TaskId::Confirmed(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for TaskId {
    type Err = Error;

    /// Parses `42` as a confirmed id and `local-1700000000000` as a pending one.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("local-") {
            Some(local) => local.parse().ok().map(TaskId::Pending),
            None => s.parse().ok().map(TaskId::Confirmed),
        };
        parsed.ok_or_else(|| Error::Parse { what: "task id", value: s.to_string() })
    }
}

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    Work,
    Personal,
    Health,
    Finance,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Finance,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Finance => "finance",
            Category::Education => "education",
            Category::Other => "other",
        }
    }
}

text_enum!(Category, "category");

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

text_enum!(Priority, "priority");

/// Where a task sits in its lifecycle.
///
/// `Cancelled` is a side exit: it can be set by an edit but is not part of the
/// advance cycle (see [`crate::lifecycle`]).
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Todo, Status::InProgress, Status::Done, Status::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Done => "done",
            Status::Cancelled => "cancelled",
        }
    }
}

text_enum!(Status, "status");

#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFrame {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Annually,
    Custom,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 5] = [
        TimeFrame::Daily,
        TimeFrame::Weekly,
        TimeFrame::Monthly,
        TimeFrame::Annually,
        TimeFrame::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Daily => "daily",
            TimeFrame::Weekly => "weekly",
            TimeFrame::Monthly => "monthly",
            TimeFrame::Annually => "annually",
            TimeFrame::Custom => "custom",
        }
    }

    /// The end date implied by the time frame when none is given.
    /// `Custom` has no implied span.
    pub fn default_end(&self, start: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            TimeFrame::Daily => 1,
            TimeFrame::Weekly => 7,
            TimeFrame::Monthly => 30,
            TimeFrame::Annually => 365,
            TimeFrame::Custom => return None,
        };
        Some(start + chrono::Duration::days(days))
    }
}

text_enum!(TimeFrame, "time frame");

fn first_version() -> u64 {
    1
}

/// A single task on the board.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub time_frame: TimeFrame,
    /// Completion percentage, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    pub estimated_hours: f64,
    /// Hours logged through the timer or by hand.
    #[serde(default)]
    pub actual_hours: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Free-text labels, in display order, without duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every mutation, used for conditional updates.
    #[serde(default = "first_version")]
    pub version: u64,
}

impl Task {
    /// Marks the task as modified at `now`.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}

/// A creation request: every task attribute except identity, progress and
/// actual hours, which the board assigns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub time_frame: TimeFrame,
    #[serde(default)]
    pub estimated_hours: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTask {
    /// A request with default category, priority, status and time frame.
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            category: Category::default(),
            priority: Priority::default(),
            status: Status::default(),
            time_frame: TimeFrame::default(),
            estimated_hours: 0.0,
            start_date,
            end_date,
            tags: Vec::new(),
        }
    }

    /// Checks the rules the creation form enforces before submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        check_dates(self.start_date, self.end_date)?;
        check_hours("estimated hours", self.estimated_hours)
    }

    /// Builds the stored task. Progress and actual hours start at zero.
    pub(crate) fn into_task(self, id: TaskId, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            category: self.category,
            priority: self.priority,
            status: self.status,
            time_frame: self.time_frame,
            progress: 0,
            estimated_hours: self.estimated_hours,
            actual_hours: 0.0,
            start_date: self.start_date,
            end_date: self.end_date,
            tags: normalize_tags(self.tags),
            created_at: now,
            updated_at: now,
            version: first_version(),
        }
    }
}

/// A partial update. `None` leaves the field as it is; an empty description
/// clears it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub time_frame: Option<TimeFrame>,
    pub progress: Option<u8>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Applies the patch to `task`, all or nothing.
    ///
    /// The date order is only checked when the patch touches a date, so tasks
    /// stored with an inverted range stay editable.
    pub fn apply(&self, task: &mut Task) -> Result<(), ValidationError> {
        let mut next = task.clone();
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle);
            }
            next.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            next.description = Some(description.clone()).filter(|d| !d.trim().is_empty());
        }
        if let Some(c) = self.category { next.category = c; }
        if let Some(p) = self.priority { next.priority = p; }
        if let Some(s) = self.status { next.status = s; }
        if let Some(tf) = self.time_frame { next.time_frame = tf; }
        if let Some(progress) = self.progress {
            if progress > 100 {
                return Err(ValidationError::ProgressOutOfRange(progress));
            }
            next.progress = progress;
        }
        if let Some(h) = self.estimated_hours {
            check_hours("estimated hours", h)?;
            next.estimated_hours = h;
        }
        if let Some(h) = self.actual_hours {
            check_hours("actual hours", h)?;
            next.actual_hours = h;
        }
        if let Some(d) = self.start_date { next.start_date = d; }
        if let Some(d) = self.end_date { next.end_date = d; }
        if self.start_date.is_some() || self.end_date.is_some() {
            check_dates(next.start_date, next.end_date)?;
        }
        if let Some(tags) = &self.tags {
            next.tags = normalize_tags(tags.clone());
        }
        *task = next;
        Ok(())
    }
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::EndNotAfterStart { start, end });
    }
    Ok(())
}

fn check_hours(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::NegativeHours { field, value });
    }
    Ok(())
}

/// Trims tags, drops empty ones and keeps the first occurrence of duplicates.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
