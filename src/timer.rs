use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::models::TaskId;

/// Hours logged per stop under the default manual policy.
pub const DEFAULT_INCREMENT_HOURS: f64 = 0.5;

/// The one running timer of a board.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ActiveTimer {
    pub task_id: TaskId,
    pub started_at: DateTime<Utc>,
}

/// How many hours a stopped timer adds to the task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerPolicy {
    /// A flat amount per stop, whatever the elapsed time.
    ManualIncrement { hours: f64 },
    /// The wall-clock time between start and stop.
    ElapsedWallClock,
}

impl Default for TimerPolicy {
    fn default() -> Self {
        TimerPolicy::ManualIncrement { hours: DEFAULT_INCREMENT_HOURS }
    }
}

impl TimerPolicy {
    /// Hours to log for a session that ran from `started_at` to `stopped_at`.
    ///
    /// A clock that went backwards logs zero.
    pub fn logged_hours(&self, started_at: DateTime<Utc>, stopped_at: DateTime<Utc>) -> f64 {
        match self {
            TimerPolicy::ManualIncrement { hours } => *hours,
            TimerPolicy::ElapsedWallClock => {
                let secs = (stopped_at - started_at).num_milliseconds() as f64 / 1000.0;
                (secs / 3600.0).max(0.0)
            }
        }
    }
}
