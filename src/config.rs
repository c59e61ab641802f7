//! Runtime configuration.
//!
//! Values come from command-line flags first, then the environment (a `.env`
//! file is honoured), then defaults:
//!
//! - `TASKBOARD_DB`: path of the task document
//!   (default `<data dir>/taskboard/tasks.json`)
//! - `TASKBOARD_TIMER`: `manual` (default) or `elapsed`
//! - `TASKBOARD_TIMER_STEP`: hours logged per stop in manual mode (default `0.5`)
//! - `RUST_LOG`: log filter (default `warn`)

use std::path::PathBuf;
use clap::ValueEnum;
use crate::error::{Error, Result};
use crate::timer::{TimerPolicy, DEFAULT_INCREMENT_HOURS};

pub const DB_ENV: &str = "TASKBOARD_DB";
pub const TIMER_ENV: &str = "TASKBOARD_TIMER";
pub const TIMER_STEP_ENV: &str = "TASKBOARD_TIMER_STEP";
pub const LOG_ENV: &str = "RUST_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Log a flat step on every stop.
    Manual,
    /// Log the real time between start and stop.
    Elapsed,
}

/// Flags given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db: Option<PathBuf>,
    pub timer: Option<TimerMode>,
    pub timer_step: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub timer_policy: TimerPolicy,
    pub log_filter: String,
}

impl Config {
    /// Resolves the configuration from the process environment.
    pub fn load(overrides: Overrides) -> Result<Config> {
        dotenvy::dotenv().ok();
        Config::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves the configuration with `lookup` standing in for the environment.
    pub fn resolve(overrides: Overrides, lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_path = overrides
            .db
            .or_else(|| non_empty(DB_ENV).map(PathBuf::from))
            .unwrap_or_else(default_db_path);

        let mode = match overrides.timer {
            Some(mode) => mode,
            None => match non_empty(TIMER_ENV) {
                Some(v) => TimerMode::from_str(&v, true).map_err(|_| Error::Config {
                    var: TIMER_ENV,
                    value: v.clone(),
                    reason: "expected 'manual' or 'elapsed'".into(),
                })?,
                None => TimerMode::Manual,
            },
        };

        let step = match overrides.timer_step {
            Some(step) => step,
            None => match non_empty(TIMER_STEP_ENV) {
                Some(v) => v.parse::<f64>().map_err(|e| Error::Config {
                    var: TIMER_STEP_ENV,
                    value: v.clone(),
                    reason: e.to_string(),
                })?,
                None => DEFAULT_INCREMENT_HOURS,
            },
        };
        if !step.is_finite() || step < 0.0 {
            return Err(Error::Config {
                var: TIMER_STEP_ENV,
                value: step.to_string(),
                reason: "must be a non-negative number of hours".into(),
            });
        }

        let timer_policy = match mode {
            TimerMode::Manual => TimerPolicy::ManualIncrement { hours: step },
            TimerMode::Elapsed => TimerPolicy::ElapsedWallClock,
        };

        Ok(Config {
            db_path,
            timer_policy,
            log_filter: non_empty(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

/// `~/.local/share/taskboard/tasks.json` on Linux, `./tasks.json` when no
/// data directory is known.
pub fn default_db_path() -> PathBuf {
    let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push("taskboard");
    p.push("tasks.json");
    p
}
