//! The todo → in-progress → done → todo status cycle.

use crate::error::TransitionError;
use crate::models::{Status, Task};

/// Statuses reachable by advancing, in cycle order.
pub const CYCLE: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

impl Status {
    /// Returns the status that follows `self` in the cycle.
    ///
    /// `Done` wraps back to `Todo`. `Cancelled` is outside the cycle and is
    /// rejected rather than reset.
    pub fn advance(self) -> Result<Status, TransitionError> {
        match self {
            Status::Todo => Ok(Status::InProgress),
            Status::InProgress => Ok(Status::Done),
            Status::Done => Ok(Status::Todo),
            Status::Cancelled => Err(TransitionError::NotInCycle(self)),
        }
    }

    pub fn in_cycle(self) -> bool {
        CYCLE.contains(&self)
    }
}

/// Advances `task` one step and returns its new status.
///
/// Landing on `Done` forces progress to 100; any other step leaves progress
/// alone. The task is untouched on error.
pub fn advance_task(task: &mut Task) -> Result<Status, TransitionError> {
    let next = task.status.advance()?;
    task.status = next;
    if next == Status::Done {
        task.progress = 100;
    }
    Ok(next)
}
