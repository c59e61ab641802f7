use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use crate::board::TaskBoard;
use crate::error::{Error, Result};
use crate::models::{NewTask, Status, Task, TaskId, TaskPatch};
use crate::timer::TimerPolicy;

/// The JSON document holding one user's board.
///
/// Every contract method is a load → mutate → save transaction. If the
/// mutation fails nothing is written, so the stored collection is unchanged.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Store {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> Error {
        Error::Io { path: self.path.display().to_string(), source }
    }

    /// Loads the board. A missing or empty file is an empty board.
    pub fn load(&self) -> Result<TaskBoard> {
        let mut f = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task document yet");
                return Ok(TaskBoard::new());
            }
            Err(e) => return Err(self.io_err(e)),
        };
        let mut s = String::new();
        f.read_to_string(&mut s).map_err(|e| self.io_err(e))?;
        if s.trim().is_empty() {
            warn!(path = %self.path.display(), "task document is empty");
            return Ok(TaskBoard::new());
        }
        let board: TaskBoard = serde_json::from_str(&s)
            .map_err(|source| Error::Json { path: self.path.display().to_string(), source })?;
        debug!(path = %self.path.display(), tasks = board.len(), "task document loaded");
        Ok(board)
    }

    /// Replaces the document with `board`, creating parent directories.
    ///
    /// The JSON is written to a sibling temporary file which is then renamed
    /// over the document, so a failed write leaves the old document intact.
    pub fn save(&self, board: &TaskBoard) -> Result<()> {
        let dir = match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
                dir
            }
            None => Path::new("."),
        };
        let s = serde_json::to_string_pretty(board)
            .map_err(|source| Error::Json { path: self.path.display().to_string(), source })?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_err(e))?;
        tmp.write_all(s.as_bytes()).map_err(|e| self.io_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_err(e.error))?;
        debug!(path = %self.path.display(), tasks = board.len(), "task document saved");
        Ok(())
    }

    /// Runs `f` against the stored board and saves only if it succeeds.
    pub fn transact<T>(&self, f: impl FnOnce(&mut TaskBoard) -> Result<T>) -> Result<T> {
        let mut board = self.load()?;
        let out = f(&mut board)?;
        self.save(&board)?;
        Ok(out)
    }

    /// Removes the document entirely.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.load()?.tasks().to_vec())
    }

    pub fn create_task(&self, new: NewTask) -> Result<Task> {
        self.transact(|b| b.create(new, Utc::now()).cloned())
    }

    pub fn update_task(&self, id: TaskId, patch: &TaskPatch, expected_version: Option<u64>) -> Result<Task> {
        self.transact(|b| b.update(id, patch, expected_version, Utc::now()).cloned())
    }

    /// Deletes `id`; an already missing task counts as success.
    pub fn delete_task(&self, id: TaskId) -> Result<bool> {
        self.transact(|b| Ok(b.delete(id)))
    }

    pub fn bulk_delete_tasks(&self, ids: &[TaskId]) -> Result<usize> {
        self.transact(|b| Ok(b.bulk_delete(ids)))
    }

    pub fn cleanup_completed_tasks(&self) -> Result<usize> {
        self.transact(|b| Ok(b.cleanup_completed()))
    }

    pub fn cleanup_old_tasks(&self, days: u32) -> Result<usize> {
        self.transact(|b| Ok(b.cleanup_old(days, Utc::now())))
    }

    pub fn advance_status(&self, id: TaskId) -> Result<Status> {
        self.transact(|b| b.advance_status(id, Utc::now()))
    }

    pub fn start_timer(&self, id: TaskId) -> Result<Option<TaskId>> {
        self.transact(|b| b.start_timer(id, Utc::now()))
    }

    pub fn stop_timer(&self, id: TaskId, policy: TimerPolicy) -> Result<f64> {
        self.transact(|b| b.stop_timer(id, Utc::now(), policy))
    }
}
