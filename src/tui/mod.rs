pub mod app;
pub mod ui;

use std::io;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use crate::error::{Error, Result};
use crate::storage::Store;
use crate::timer::TimerPolicy;
use app::{App, InputMode};
use ui::ui;

fn terminal_err(source: io::Error) -> Error {
    Error::Io { path: "terminal".into(), source }
}

pub fn run_tui(store: Store, policy: TimerPolicy) -> Result<()> {
    // Load before touching the terminal so a broken document is reported plainly.
    let mut app = App::new(store, policy)?;

    enable_raw_mode().map_err(terminal_err)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(terminal_err)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(terminal_err)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode().map_err(terminal_err)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    ).map_err(terminal_err)?;
    terminal.show_cursor().map_err(terminal_err)?;

    res.map_err(terminal_err)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else { continue; };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') => app.advance_selected(),
                KeyCode::Char('s') => app.toggle_timer_selected(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                KeyCode::Char('x') => app.toggle_mark(),
                KeyCode::Char('D') => app.bulk_delete_marked(),
                KeyCode::Char('C') => app.start_cleanup(),
                KeyCode::Char('f') => app.cycle_filter(),
                KeyCode::Char('/') => app.start_search(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('r') => app.reload(),
                _ => {}
            },
            InputMode::ConfirmCleanup => app.confirm_cleanup(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'))),
            InputMode::Searching | InputMode::Adding => match key.code {
                KeyCode::Enter => app.handle_input(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Char(c) => app.push_char(c),
                KeyCode::Backspace => app.pop_char(),
                _ => {}
            },
        }
    }
}
