//! Drawing a session
//!
//! ```text
//! ┌ mnemon ─ Config │ Memories │ Monitor ─────────────┐  header (tabs)
//! │ active pane                                        │
//! └────────────────────────────────────────────────────┘
//!  status line of the active pane
//!  key hints                               stream state   footer
//! ```
//!
//! Modals are drawn last, over everything else.

use crate::session::{ConnectionState, DashboardSession, MemoryField, StatusLine, Tab};
use crate::tui::widgets::StatusBar;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};
use tui_textarea::TextArea;

const MEMORY_COLUMNS: [&str; 5] = ["ID", "Content", "Server", "User", "Created"];
const AGENT_COLUMNS: [&str; 4] = ["Channel", "Server", "Last active", "Queue"];

/// Draw the whole dashboard
pub fn render(frame: &mut Frame, session: &mut DashboardSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tabs(frame, chunks[0], session.active_tab());

    match session.active_tab() {
        Tab::Config => render_config(frame, chunks[1], session),
        Tab::Memories => render_memories(frame, chunks[1], session),
        Tab::Monitor => render_monitor(frame, chunks[1], session),
    }

    let status = match session.active_tab() {
        Tab::Config => &session.config.status,
        Tab::Memories => &session.memories.status,
        Tab::Monitor => &session.monitor.status,
    };
    frame.render_widget(status_paragraph(status), chunks[2]);

    frame.render_widget(footer(session), chunks[3]);

    let full = frame.area();
    session.modals.render(frame, full);
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Tab) {
    let titles = Tab::all()
        .iter()
        .map(|tab| Line::from(format!("F{} {}", tab.index() + 1, tab.title())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" mnemon "))
        .select(active.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_config(frame: &mut Frame, area: Rect, session: &mut DashboardSession) {
    if session.config.is_loading() && !session.config.is_loaded() {
        let loading = Paragraph::new("Loading...")
            .block(Block::default().borders(Borders::ALL).title("Config"));
        frame.render_widget(loading, area);
        return;
    }
    frame.render_widget(session.config.editor(), area);
}

fn render_memories(frame: &mut Frame, area: Rect, session: &mut DashboardSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(chunks[0]);

    let focus = session.memories.focus;
    for (field, area) in [MemoryField::Server, MemoryField::User, MemoryField::Query]
        .into_iter()
        .zip(inputs.iter())
    {
        if let Some(input) = session.memories.form.input_mut(field) {
            style_input(input, field.label(), field == focus);
            frame.render_widget(&*input, *area);
        }
    }

    let header = Row::new(MEMORY_COLUMNS.map(Cell::from))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = session
        .memories
        .rows()
        .iter()
        .map(|row| Row::new(row.cells().clone().map(Cell::from)))
        .collect::<Vec<_>>();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(19),
        ],
    )
    .header(header)
    .block(focus_block(
        "Results (e edit, d delete, r refresh)",
        focus == MemoryField::Table,
    ))
    .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, chunks[1], &mut session.memories.table_state);
}

fn render_monitor(frame: &mut Frame, area: Rect, session: &DashboardSession) {
    let header = Row::new(AGENT_COLUMNS.map(Cell::from))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = session
        .monitor
        .rows()
        .iter()
        .map(|cells| Row::new(cells.clone().map(Cell::from)))
        .collect::<Vec<_>>();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Min(14),
            Constraint::Length(19),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Active agents"),
    );
    frame.render_widget(table, area);
}

fn style_input(input: &mut TextArea<'static>, label: &'static str, focused: bool) {
    input.set_block(focus_block(label, focused));
    input.set_cursor_line_style(Style::default());
    let cursor = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    input.set_cursor_style(cursor);
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn status_paragraph(status: &StatusLine) -> Paragraph<'_> {
    let style = if status.is_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    Paragraph::new(format!(" {}", status.text())).style(style)
}

fn footer(session: &DashboardSession) -> StatusBar<'static> {
    let state = session.monitor.state();
    let color = match state {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Reconnecting | ConnectionState::Disconnected => Color::Red,
    };

    let bar = StatusBar::new().hint("F1-F3", "tabs");
    let bar = match session.active_tab() {
        Tab::Config => bar.hint("^S", "save"),
        Tab::Memories => bar.hint("Tab", "focus").hint("Enter", "search"),
        Tab::Monitor => bar.hint("q", "quit"),
    };
    bar.hint("^R", "reconnect")
        .hint("^Q", "quit")
        .badge(state.label(), color)
}
