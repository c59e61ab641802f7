//! # Taskboard
//!
//! A personal task scheduler for the terminal. Taskboard pairs a scriptable CLI with an interactive dashboard for day-to-day tracking.
//!
//! ## Features
//!
//! *   **Categorized tasks**: category, priority, time frame, start/end dates, tags and an hours estimate.
//! *   **Status cycle**: `todo → in-progress → done → todo`; reaching done sets progress to 100%.
//! *   **Timer**: one running timer at a time. Stopping it logs a flat step (default 0.5h) or the real elapsed time.
//! *   **Analytics**: totals, completion rate, breakdowns by category and priority, overdue count.
//! *   **Cleanup**: remove completed tasks, stale unfinished tasks, or an explicit set of ids.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive dashboard
//! taskboard
//!
//! # Add a task due in a week
//! taskboard add "Write report" --category work --priority high --frame weekly --hours 3
//!
//! # List open work, most urgent first
//! taskboard list --status todo --category work --sort urgency
//!
//! # Move a task along the cycle, track time
//! taskboard advance 3
//! taskboard timer start 3
//! taskboard timer stop 3
//!
//! # Housekeeping
//! taskboard cleanup completed
//! taskboard cleanup old --days 30
//! taskboard bulk-remove 4 5 9
//! ```
//!
//! #### Dashboard Key Bindings
//! *   `Space`: Advance status
//! *   `s`: Start/stop the timer
//! *   `a`: Add task
//! *   `d`: Delete, `x`: Mark, `D`: Delete marked
//! *   `C`: Delete all completed tasks
//! *   `f`: Cycle status filter, `/`: Search titles
//! *   `q`: Quit
//!
//! ## Configuration
//!
//! Tasks live in `~/.local/share/taskboard/tasks.json` (platform data dir).
//! Override with `--db` or `TASKBOARD_DB`. `TASKBOARD_TIMER=elapsed` switches the
//! timer to wall-clock tracking; `TASKBOARD_TIMER_STEP` sets the manual step.
//! `RUST_LOG` controls logging.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing::error;
use taskboard::commands::*;
use taskboard::config::{Config, Overrides, TimerMode};
use taskboard::error::{Result, ValidationError};
use taskboard::filter::{StatusFilter, TaskQuery};
use taskboard::logging;
use taskboard::models::{Category, NewTask, Priority, Status, TaskId, TaskPatch, TimeFrame};
use taskboard::storage::Store;
use taskboard::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Personal task scheduler with timers and analytics", long_about = None)]
struct Cli {
    /// Path of the task document
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Timer policy: a flat step per stop, or real elapsed time
    #[arg(long, global = true)]
    timer: Option<TimerMode>,
    /// Hours logged per stop with the manual timer
    #[arg(long, global = true)]
    timer_step: Option<f64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, default_value = "work")]
        category: Category,
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        #[arg(short, long, default_value = "todo")]
        status: Status,
        /// Time frame; also sets the end date when --end is omitted
        #[arg(short, long, default_value = "daily")]
        frame: TimeFrame,
        /// Estimated hours (float), e.g. 1.5
        #[arg(short = 'H', long, default_value_t = 0.0)]
        hours: f64,
        /// Start date in YYYY-MM-DD (default today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// End date in YYYY-MM-DD, must be after the start
        #[arg(short, long)]
        end: Option<NaiveDate>,
        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List tasks
    List {
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
        /// Case-insensitive text to look for in titles
        #[arg(short = 'q', long, default_value = "")]
        search: String,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(long, default_value = "created")]
        sort: SortKey,
    },
    /// Show every field of a task
    Show {
        id: TaskId,
    },
    /// Edit a task
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        /// New description (empty to clear)
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        priority: Option<Priority>,
        #[arg(short, long)]
        status: Option<Status>,
        #[arg(short, long)]
        frame: Option<TimeFrame>,
        /// Progress percentage 0-100
        #[arg(long)]
        progress: Option<u8>,
        /// New estimated hours
        #[arg(short = 'H', long)]
        hours: Option<f64>,
        /// New actual hours
        #[arg(long)]
        actual: Option<f64>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(short, long)]
        end: Option<NaiveDate>,
        /// Replace the tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Refuse the edit unless the task is still at this version
        #[arg(long)]
        expect_version: Option<u64>,
    },
    /// Remove a task
    Remove {
        id: TaskId,
    },
    /// Remove several tasks at once; unknown ids are ignored
    BulkRemove {
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
    /// Move a task to the next status (todo → in-progress → done → todo)
    Advance {
        id: TaskId,
    },
    /// Track time on a task
    Timer {
        #[command(subcommand)]
        command: TimerCommands,
    },
    /// Remove completed or stale tasks
    Cleanup {
        #[command(subcommand)]
        command: CleanupCommands,
    },
    /// Show task counters
    Stats,
    /// Show the analytics report
    Report,
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive dashboard
    Ui,
}

#[derive(Subcommand)]
enum TimerCommands {
    /// Start the timer on a task (replaces any running timer)
    Start { id: TaskId },
    /// Stop the timer on a task and log hours
    Stop { id: TaskId },
    /// Show the running timer
    Status,
}

#[derive(Subcommand)]
enum CleanupCommands {
    /// Remove every done task
    Completed {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Remove unfinished tasks created at least DAYS days ago
    Old {
        #[arg(short, long)]
        days: u32,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn run(command: Commands, config: &Config) -> Result<()> {
    let store = Store::new(&config.db_path);
    match command {
        Commands::Add { title, description, category, priority, status, frame, hours, start, end, tags } => {
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            let end = end
                .or_else(|| frame.default_end(start))
                .ok_or(ValidationError::MissingEndDate)?;
            let new = NewTask {
                title,
                description,
                category,
                priority,
                status,
                time_frame: frame,
                estimated_hours: hours,
                start_date: start,
                end_date: end,
                tags,
            };
            cmd_add(&store, new, false).map(|_| ())
        }
        Commands::List { status, search, category, priority, sort } => {
            cmd_list(&store, &TaskQuery { status, search, category, priority }, sort)
        }
        Commands::Show { id } => cmd_show(&store, id),
        Commands::Edit {
            id, title, description, category, priority, status, frame, progress, hours, actual, start, end, tags,
            expect_version,
        } => {
            let patch = TaskPatch {
                title,
                description,
                category,
                priority,
                status,
                time_frame: frame,
                progress,
                estimated_hours: hours,
                actual_hours: actual,
                start_date: start,
                end_date: end,
                tags,
            };
            cmd_edit(&store, id, patch, expect_version, false)
        }
        Commands::Remove { id } => cmd_remove(&store, id, false).map(|_| ()),
        Commands::BulkRemove { ids } => cmd_bulk_remove(&store, &ids, false).map(|_| ()),
        Commands::Advance { id } => cmd_advance(&store, id, false).map(|_| ()),
        Commands::Timer { command } => match command {
            TimerCommands::Start { id } => cmd_timer_start(&store, id, false),
            TimerCommands::Stop { id } => cmd_timer_stop(&store, id, config.timer_policy, false).map(|_| ()),
            TimerCommands::Status => cmd_timer_status(&store),
        },
        Commands::Cleanup { command } => match command {
            CleanupCommands::Completed { force } => cmd_cleanup_completed(&store, force, false).map(|_| ()),
            CleanupCommands::Old { days, force } => cmd_cleanup_old(&store, days, force, false).map(|_| ()),
        },
        Commands::Stats => cmd_stats(&store),
        Commands::Report => cmd_report(&store),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "taskboard", &mut io::stdout());
            Ok(())
        }
        Commands::Ui => run_tui(store, config.timer_policy),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match Config::load(Overrides { db: cli.db, timer: cli.timer, timer_step: cli.timer_step }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let command = cli.command.unwrap_or(Commands::Ui);
    if matches!(command, Commands::Ui) {
        // Logging to stderr would draw over the dashboard.
        let log_path = config.db_path.with_file_name("taskboard.log");
        if let Err(e) = logging::init_file(&config.log_filter, &log_path) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    } else {
        logging::init_stderr(&config.log_filter);
    }

    match run(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
