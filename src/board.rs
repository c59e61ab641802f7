//! The task collection and everything that mutates it.
//!
//! `TaskBoard` is the aggregate root: it owns the tasks, hands out confirmed
//! ids and holds the single active timer. Every mutation goes through it so
//! the "at most one running timer" and "unique id" invariants are kept in one
//! place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::error::{Error, Result};
use crate::lifecycle::advance_task;
use crate::models::{NewTask, Status, Task, TaskId, TaskPatch};
use crate::stats::{aggregate_stats, Stats};
use crate::timer::{ActiveTimer, TimerPolicy};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    /// Next confirmed id to hand out. Never reused.
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    active_timer: Option<ActiveTimer>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new() -> TaskBoard {
        TaskBoard::default()
    }

    /// Builds a board around already stored tasks.
    pub fn with_tasks(tasks: Vec<Task>) -> TaskBoard {
        TaskBoard { tasks, ..TaskBoard::default() }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id).ok_or(Error::NotFound(id))
    }

    pub fn active_timer(&self) -> Option<&ActiveTimer> {
        self.active_timer.as_ref()
    }

    pub fn stats(&self) -> Stats {
        aggregate_stats(&self.tasks)
    }

    fn allocate_id(&mut self) -> Result<u64> {
        // Tolerate hand-edited documents whose counter lags behind the ids.
        let max_confirmed = self
            .tasks
            .iter()
            .filter_map(|t| match t.id {
                TaskId::Confirmed(id) => Some(id),
                TaskId::Pending(_) => None,
            })
            .max()
            .unwrap_or(0);
        let after_max = max_confirmed.checked_add(1).ok_or(Error::IdSpaceExhausted)?;
        let id = self.next_id.max(after_max).max(1);
        self.next_id = id.checked_add(1).ok_or(Error::IdSpaceExhausted)?;
        Ok(id)
    }

    /// Validates and stores a new task under a freshly assigned confirmed id.
    pub fn create(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<&Task> {
        new.validate()?;
        let id = TaskId::Confirmed(self.allocate_id()?);
        self.tasks.push(new.into_task(id, now));
        info!(%id, "task created");
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Adds a task optimistically, before the store has assigned its id.
    ///
    /// The task is keyed by the creation time in epoch milliseconds, bumped
    /// forward if another pending task already holds that key.
    pub fn create_pending(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<TaskId> {
        new.validate()?;
        let mut local = now.timestamp_millis();
        while self.get(TaskId::Pending(local)).is_some() {
            local += 1;
        }
        let id = TaskId::Pending(local);
        self.tasks.push(new.into_task(id, now));
        debug!(%id, "pending task added");
        Ok(id)
    }

    /// Replaces the pending id `local` with the store-assigned `server_id`.
    ///
    /// The task and the timer reference are rewritten together. A stale copy
    /// already carrying `server_id` is dropped first.
    pub fn confirm(&mut self, local: i64, server_id: u64) -> Result<TaskId> {
        let pending = TaskId::Pending(local);
        if self.get(pending).is_none() {
            return Err(Error::PendingNotFound(local));
        }
        let after = server_id.checked_add(1).ok_or(Error::IdSpaceExhausted)?;
        let confirmed = TaskId::Confirmed(server_id);
        self.tasks.retain(|t| t.id != confirmed);
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == pending) {
            task.id = confirmed;
        }
        if let Some(timer) = self.active_timer.as_mut() {
            if timer.task_id == pending {
                timer.task_id = confirmed;
            }
        }
        self.next_id = self.next_id.max(after);
        debug!(%pending, %confirmed, "pending task confirmed");
        Ok(confirmed)
    }

    /// Swaps in `task` for the one holding the same id, e.g. the copy the
    /// store wrote after a confirmation.
    pub fn replace(&mut self, task: Task) -> Result<()> {
        let slot = self.find_mut(task.id)?;
        *slot = task;
        Ok(())
    }

    /// Applies `patch` to a task.
    ///
    /// With `expected_version` set, the update is refused unless the stored
    /// version matches. An empty patch changes nothing.
    pub fn update(
        &mut self,
        id: TaskId,
        patch: &TaskPatch,
        expected_version: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<&Task> {
        let task = self.find_mut(id)?;
        if let Some(expected) = expected_version {
            if task.version != expected {
                return Err(Error::VersionConflict { id, expected, actual: task.version });
            }
        }
        if !patch.is_empty() {
            patch.apply(task)?;
            task.touch(now);
            info!(%id, version = task.version, "task updated");
        }
        Ok(&*task)
    }

    /// Advances a task along the status cycle.
    pub fn advance_status(&mut self, id: TaskId, now: DateTime<Utc>) -> Result<Status> {
        let task = self.find_mut(id)?;
        let next = advance_task(task)?;
        task.touch(now);
        info!(%id, status = %next, "task advanced");
        Ok(next)
    }

    /// Removes every task matching `pred` and returns how many went.
    /// A running timer on a removed task is cleared.
    fn remove_where(&mut self, pred: impl Fn(&Task) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !pred(t));
        if let Some(timer) = self.active_timer {
            if self.get(timer.task_id).is_none() {
                debug!(id = %timer.task_id, "timer cleared with its task");
                self.active_timer = None;
            }
        }
        before - self.tasks.len()
    }

    /// Deletes one task. A missing id is not an error; the return value says
    /// whether anything was removed.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let removed = self.remove_where(|t| t.id == id) > 0;
        info!(%id, removed, "task deleted");
        removed
    }

    /// Deletes every listed task. Unknown ids are ignored.
    pub fn bulk_delete(&mut self, ids: &[TaskId]) -> usize {
        let removed = self.remove_where(|t| ids.contains(&t.id));
        info!(requested = ids.len(), removed, "bulk delete");
        removed
    }

    /// Deletes every done task.
    pub fn cleanup_completed(&mut self) -> usize {
        let removed = self.remove_where(|t| t.status == Status::Done);
        info!(removed, "completed tasks cleaned up");
        removed
    }

    /// Deletes every task that is not done and is at least `days` whole days old.
    pub fn cleanup_old(&mut self, days: u32, now: DateTime<Utc>) -> usize {
        let threshold = i64::from(days);
        let removed = self.remove_where(|t| {
            t.status != Status::Done && (now - t.created_at).num_days() >= threshold
        });
        info!(days, removed, "old tasks cleaned up");
        removed
    }

    /// Starts the timer on `id`.
    ///
    /// Any other running timer is replaced without logging hours; its task
    /// id is returned.
    pub fn start_timer(&mut self, id: TaskId, now: DateTime<Utc>) -> Result<Option<TaskId>> {
        if self.get(id).is_none() {
            return Err(Error::NotFound(id));
        }
        let displaced = self
            .active_timer
            .replace(ActiveTimer { task_id: id, started_at: now })
            .map(|t| t.task_id)
            .filter(|prev| *prev != id);
        info!(%id, "timer started");
        Ok(displaced)
    }

    /// Stops the timer on `id` and logs hours according to `policy`.
    /// Returns the hours added.
    pub fn stop_timer(&mut self, id: TaskId, now: DateTime<Utc>, policy: TimerPolicy) -> Result<f64> {
        let timer = match self.active_timer {
            Some(timer) if timer.task_id == id => timer,
            _ => return Err(Error::TimerNotRunning(id)),
        };
        let hours = policy.logged_hours(timer.started_at, now);
        let task = self.find_mut(id)?;
        task.actual_hours += hours;
        task.touch(now);
        self.active_timer = None;
        info!(%id, hours, "timer stopped");
        Ok(hours)
    }
}
