use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
    Frame,
};
use chrono::Local;
use crate::models::{Priority, Status};
use crate::stats::is_overdue;
use super::app::{App, InputMode};

fn status_style(status: Status) -> Style {
    match status {
        Status::Todo => Style::default().fg(Color::Yellow),
        Status::InProgress => Style::default().fg(Color::Cyan),
        Status::Done => Style::default().fg(Color::Green),
        Status::Cancelled => Style::default().fg(Color::DarkGray),
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Status / help
        ].as_ref())
        .split(f.area());

    render_stats(f, app, chunks[0]);

    let today = Local::now().date_naive();
    let timer_task = app.timer_task();
    let rows: Vec<Row> = app
        .visible_tasks()
        .into_iter()
        .map(|t| {
            let mark = match (app.marked.contains(&t.id), timer_task == Some(t.id)) {
                (true, true) => "*⏱",
                (true, false) => "*",
                (false, true) => "⏱",
                (false, false) => "",
            };
            let end_style = if is_overdue(t, today) {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            let priority_style = match t.priority {
                Priority::Urgent => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                Priority::High => Style::default().fg(Color::Yellow),
                _ => Style::default(),
            };
            Row::new(vec![
                Cell::from(mark),
                Cell::from(t.id.to_string()),
                Cell::from(t.title.clone()),
                Cell::from(t.category.to_string()),
                Cell::from(t.priority.to_string()).style(priority_style),
                Cell::from(t.status.to_string()).style(status_style(t.status)),
                Cell::from(format!("{}%", t.progress)),
                Cell::from(format!("{:.1}/{:.1}", t.actual_hours, t.estimated_hours)),
                Cell::from(t.end_date.to_string()).style(end_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(11),
    ];

    let title = format!(
        "Taskboard - {} ({})",
        app.query.status,
        if app.query.search.is_empty() { "no search".to_string() } else { format!("\"{}\"", app.query.search) },
    );
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "ID", "Title", "Category", "Priority", "Status", "Prog", "Hours", "End"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | Space: Advance | s: Timer | d: Del | x: Mark | D: Del marked | C: Clean done | f: Filter | /: Search | r: Reload",
        InputMode::Searching => "Type to search | Enter: Keep | Esc: Clear",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
        InputMode::ConfirmCleanup => "Delete all completed tasks? y: Yes | any other key: No",
    };
    let status_line = match &app.message {
        Some(msg) => Line::from(vec![
            Span::styled(msg.clone(), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(help_text, Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(Span::styled(help_text, Style::default().fg(Color::Gray))),
    };
    let help = Paragraph::new(status_line).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    // Render Input Box if needed
    let title = match app.input_mode {
        InputMode::Searching => "Search titles",
        InputMode::Adding => match app.add_state.step {
            0 => "Add Task: Enter Title",
            1 => "Add Task: Category (work/personal/health/finance/education/other)",
            2 => "Add Task: Priority (low/medium/high/urgent)",
            3 => "Add Task: Start Date (YYYY-MM-DD, empty = today)",
            4 => "Add Task: End Date (YYYY-MM-DD)",
            5 => "Add Task: Estimated Hours (optional)",
            _ => "Add Task",
        },
        _ => return,
    };
    let area = centered_rect(60, 3, f.area());
    f.render_widget(Clear, area);
    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.stats();
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(area);

    let counts = Paragraph::new(format!(
        "Total {}  |  Todo {}  |  In progress {}  |  Done {}",
        stats.total, stats.todo, stats.in_progress, stats.completed
    ))
    .block(Block::default().borders(Borders::ALL).title("Overview"));
    f.render_widget(counts, halves[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Completion"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(stats.completion_rate.min(100) as u16);
    f.render_widget(gauge, halves[1]);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
