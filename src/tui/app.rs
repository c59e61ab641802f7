use std::collections::HashSet;
use chrono::{Local, NaiveDate, Utc};
use ratatui::widgets::TableState;
use tracing::warn;
use crate::board::TaskBoard;
use crate::error::{Error, Result};
use crate::filter::TaskQuery;
use crate::models::{Category, NewTask, Priority, Task, TaskId};
use crate::stats::Stats;
use crate::storage::Store;
use crate::timer::TimerPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
    Adding,
    ConfirmCleanup,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub step: usize, // 0: Title, 1: Category, 2: Priority, 3: Start, 4: End, 5: Hours
}

pub struct App {
    store: Store,
    policy: TimerPolicy,
    /// The session's copy of the collection. The store is the source of truth.
    pub board: TaskBoard,
    pub query: TaskQuery,
    /// Ids of the rows currently shown, in display order.
    pub visible: Vec<TaskId>,
    pub marked: HashSet<TaskId>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Last outcome shown in the status line.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(store: Store, policy: TimerPolicy) -> Result<App> {
        let board = store.load()?;
        let mut app = App {
            store,
            policy,
            board,
            query: TaskQuery::default(),
            visible: Vec::new(),
            marked: HashSet::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            message: None,
        };
        app.refresh_view();
        Ok(app)
    }

    pub fn stats(&self) -> Stats {
        self.board.stats()
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.visible.iter().filter_map(|id| self.board.get(*id)).collect()
    }

    pub fn timer_task(&self) -> Option<TaskId> {
        self.board.active_timer().map(|t| t.task_id)
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.state.selected().and_then(|i| self.visible.get(i).copied())
    }

    /// Re-applies the query to the in-memory board and fixes up the selection.
    pub fn refresh_view(&mut self) {
        self.visible = self.query.apply(self.board.tasks()).iter().map(|t| t.id).collect();
        self.marked.retain(|id| self.board.get(*id).is_some());
        if self.visible.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.visible.len() {
                self.state.select(Some(self.visible.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Reloads the board from the store.
    pub fn reload(&mut self) {
        match self.store.load() {
            Ok(board) => self.board = board,
            Err(e) => self.report(e),
        }
        self.refresh_view();
    }

    fn report(&mut self, e: Error) {
        warn!(error = %e, "dashboard action failed");
        self.message = Some(format!("Error: {}", e));
    }

    /// Runs a store operation and reloads; errors land in the status line.
    fn run<T>(&mut self, op: impl FnOnce(&Store) -> Result<T>, describe: impl FnOnce(T) -> String) {
        match op(&self.store) {
            Ok(out) => self.message = Some(describe(out)),
            Err(e) => self.report(e),
        }
        self.reload();
    }

    /// Selects the next row.
    pub fn next(&mut self) {
        if self.visible.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row.
    pub fn previous(&mut self) {
        if self.visible.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn advance_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.run(|s| s.advance_status(id), |status| format!("Task {} is now {}", id, status));
        }
    }

    /// Starts the timer on the selected task, or stops it if it is the one running.
    pub fn toggle_timer_selected(&mut self) {
        let Some(id) = self.selected_id() else { return; };
        if self.timer_task() == Some(id) {
            let policy = self.policy;
            self.run(|s| s.stop_timer(id, policy), |h| format!("Logged {:.2}h on task {}", h, id));
        } else {
            self.run(|s| s.start_timer(id), |prev| match prev {
                Some(prev) => format!("Timer moved from task {} to task {}", prev, id),
                None => format!("Timer started on task {}", id),
            });
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.run(|s| s.delete_task(id), |_| format!("Task {} removed", id));
        }
    }

    pub fn toggle_mark(&mut self) {
        if let Some(id) = self.selected_id() {
            if !self.marked.remove(&id) {
                self.marked.insert(id);
            }
        }
    }

    pub fn bulk_delete_marked(&mut self) {
        if self.marked.is_empty() {
            self.message = Some("Nothing marked (x to mark)".into());
            return;
        }
        let ids: Vec<TaskId> = self.marked.drain().collect();
        self.run(|s| s.bulk_delete_tasks(&ids), |n| format!("{} task(s) removed", n));
    }

    pub fn start_cleanup(&mut self) {
        self.input_mode = InputMode::ConfirmCleanup;
    }

    pub fn confirm_cleanup(&mut self, yes: bool) {
        self.input_mode = InputMode::Normal;
        if yes {
            self.run(|s| s.cleanup_completed_tasks(), |n| format!("{} completed task(s) removed", n));
        } else {
            self.message = Some("Cleanup aborted".into());
        }
    }

    pub fn cycle_filter(&mut self) {
        self.query.status = self.query.status.next();
        self.refresh_view();
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input_buffer = self.query.search.clone();
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        if self.input_mode == InputMode::Searching {
            self.query.search.clear();
            self.refresh_view();
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn push_char(&mut self, c: char) {
        self.input_buffer.push(c);
        if self.input_mode == InputMode::Searching {
            self.query.search = self.input_buffer.clone();
            self.refresh_view();
        }
    }

    pub fn pop_char(&mut self) {
        self.input_buffer.pop();
        if self.input_mode == InputMode::Searching {
            self.query.search = self.input_buffer.clone();
            self.refresh_view();
        }
    }

    /// Handles Enter based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Searching => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            InputMode::Adding => self.handle_adding_input(),
            _ => {}
        }
    }

    fn handle_adding_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => { // Title
                if input.is_empty() { return; }
                self.add_state.title = input;
            }
            1 => { // Category
                if !input.is_empty() {
                    match input.parse() {
                        Ok(c) => self.add_state.category = c,
                        Err(e) => { self.message = Some(e.to_string()); return; }
                    }
                }
            }
            2 => { // Priority
                if !input.is_empty() {
                    match input.parse() {
                        Ok(p) => self.add_state.priority = p,
                        Err(e) => { self.message = Some(e.to_string()); return; }
                    }
                }
            }
            3 | 4 => { // Start / End
                let date = if input.is_empty() && self.add_state.step == 3 {
                    Local::now().date_naive()
                } else {
                    match NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
                        Ok(d) => d,
                        Err(_) => { self.message = Some("Use YYYY-MM-DD".into()); return; }
                    }
                };
                if self.add_state.step == 3 {
                    self.add_state.start_date = Some(date);
                } else {
                    self.add_state.end_date = Some(date);
                }
            }
            5 => { // Hours
                let hours = if input.is_empty() { 0.0 } else {
                    match input.parse::<f64>() {
                        Ok(h) => h,
                        Err(_) => { self.message = Some("Enter a number of hours".into()); return; }
                    }
                };
                self.finish_add(hours);
                return;
            }
            _ => {}
        }
        self.add_state.step += 1;
        self.input_buffer.clear();
    }

    /// Shows the task at once under a pending id, then swaps in the task the
    /// store wrote. A rejected task is dropped again.
    fn finish_add(&mut self, hours: f64) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        let (Some(start), Some(end)) = (self.add_state.start_date, self.add_state.end_date) else { return; };
        let mut new = NewTask::new(self.add_state.title.clone(), start, end);
        new.category = self.add_state.category;
        new.priority = self.add_state.priority;
        new.estimated_hours = hours;

        let pending = match self.board.create_pending(new.clone(), Utc::now()) {
            Ok(id) => id,
            Err(e) => { self.report(e); return; }
        };
        self.refresh_view();

        let confirmed = self.store.create_task(new).and_then(|stored| {
            let id = match (pending, stored.id) {
                (TaskId::Pending(local), TaskId::Confirmed(server_id)) => self.board.confirm(local, server_id)?,
                (_, other) => other,
            };
            // Timestamps and version come from the store's copy.
            self.board.replace(stored)?;
            Ok(id)
        });
        match confirmed {
            Ok(id) => self.message = Some(format!("Task added (id = {})", id)),
            Err(e) => {
                self.board.delete(pending);
                self.report(e);
            }
        }
        self.refresh_view();
    }
}
