//! # Taskboard
//!
//! A personal task scheduler for the terminal: create and categorize tasks,
//! move them through todo → in-progress → done, track time spent with a
//! single running timer, and watch completion analytics.
//!
//! The library holds the task domain ([`board::TaskBoard`] and the pure
//! functions around it) and the JSON document store. The `taskboard` binary
//! puts a CLI and an interactive dashboard on top.

pub mod board;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod tui;
pub mod urgency;

pub use board::TaskBoard;
pub use error::{Error, Result};
pub use models::{Category, NewTask, Priority, Status, Task, TaskId, TaskPatch, TimeFrame};
pub use storage::Store;
