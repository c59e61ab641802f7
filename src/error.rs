use thiserror::Error;
use crate::models::{Status, TaskId};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading, mutating or saving tasks.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed task document {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("task {id} changed underneath you (expected version {expected}, found {actual})")]
    VersionConflict { id: TaskId, expected: u64, actual: u64 },

    #[error("no timer is running for task {0}")]
    TimerNotRunning(TaskId),

    #[error("no task ids left to assign")]
    IdSpaceExhausted,

    #[error("no pending task with local id {0}")]
    PendingNotFound(i64),

    #[error("invalid {what} '{value}'")]
    Parse { what: &'static str, value: String },

    #[error("invalid configuration {var}='{value}': {reason}")]
    Config {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Rejections raised by task creation and edits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,

    #[error("end date {end} must be after start date {start}")]
    EndNotAfterStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("an end date is required for custom time frames")]
    MissingEndDate,

    #[error("{field} must be a non-negative number, got {value}")]
    NegativeHours { field: &'static str, value: f64 },

    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u8),
}

/// Raised when a status cannot advance along the todo/in-progress/done cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("status '{0}' is not part of the todo/in-progress/done cycle")]
    NotInCycle(Status),
}
