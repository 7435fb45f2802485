//! Dialog widgets for user interactions

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

/// Dialog trait for modal interactions
pub trait Dialog {
    /// Render the dialog
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Handle keyboard input
    /// Returns true if dialog should close
    fn handle_key(&mut self, key: KeyEvent) -> bool;

    /// Check if dialog is visible
    fn is_visible(&self) -> bool;

    /// Get dialog result (if any)
    fn result(&self) -> DialogResult;
}

/// Dialog result types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// User confirmed
    Confirmed,
    /// User confirmed with input
    ConfirmedWithInput(String),
    /// User cancelled
    Cancelled,
    /// No result yet
    Pending,
}

/// Centered rectangle of at most `width` x `height` inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = area.width.min(width);
    let height = area.height.min(height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

/// Clear the dialog area and draw its frame; returns the inner area
fn frame_dialog(frame: &mut Frame, area: Rect, title: &str, accent: Color) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
}

/// Confirm dialog for Yes/No decisions
pub struct ConfirmDialog {
    title: String,
    message: String,
    preview: Option<String>,
    visible: bool,
    result: DialogResult,
    selected: usize, // 0 = Yes, 1 = No
}

impl ConfirmDialog {
    /// Create new confirm dialog
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            preview: None,
            visible: true,
            result: DialogResult::Pending,
            selected: 0,
        }
    }

    /// Set preview text
    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }
}

impl Dialog for ConfirmDialog {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let height = if self.preview.is_some() { 14 } else { 9 };
        let dialog_area = centered(area, 70, height);
        let inner = frame_dialog(frame, dialog_area, &self.title, Color::Cyan);

        let chunks = if self.preview.is_some() {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(2), // Message
                    Constraint::Min(3),    // Preview
                    Constraint::Length(1), // Buttons
                    Constraint::Length(1), // Hint
                ])
                .split(inner)
        } else {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(2),    // Message
                    Constraint::Length(1), // Buttons
                    Constraint::Length(1), // Hint
                ])
                .split(inner)
        };

        let message = Paragraph::new(self.message.as_str())
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center);
        frame.render_widget(message, chunks[0]);

        if let Some(preview_text) = &self.preview {
            let preview = Paragraph::new(preview_text.as_str())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(preview, chunks[1]);
        }

        let button_idx = if self.preview.is_some() { 2 } else { 1 };
        let button_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[button_idx]);

        let yes_style = if self.selected == 0 {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let yes_button = Paragraph::new("[ Yes ]")
            .style(yes_style)
            .alignment(Alignment::Center);
        frame.render_widget(yes_button, button_chunks[0]);

        let no_style = if self.selected == 1 {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_button = Paragraph::new("[ No ]")
            .style(no_style)
            .alignment(Alignment::Center);
        frame.render_widget(no_button, button_chunks[1]);

        frame.render_widget(hint("←→: Select | Enter: Choose | y/n | Esc: Cancel"), chunks[button_idx + 1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected = 0;
                false
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected = 1;
                false
            }
            KeyCode::Tab => {
                self.selected = (self.selected + 1) % 2;
                false
            }
            KeyCode::Char('y') => {
                self.result = DialogResult::Confirmed;
                self.visible = false;
                true
            }
            KeyCode::Char('n') => {
                self.result = DialogResult::Cancelled;
                self.visible = false;
                true
            }
            KeyCode::Enter => {
                self.result = if self.selected == 0 {
                    DialogResult::Confirmed
                } else {
                    DialogResult::Cancelled
                };
                self.visible = false;
                true
            }
            KeyCode::Esc => {
                self.result = DialogResult::Cancelled;
                self.visible = false;
                true
            }
            _ => false,
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn result(&self) -> DialogResult {
        self.result.clone()
    }
}

/// Input dialog for single-line text entry
pub struct InputDialog {
    title: String,
    prompt: String,
    input: TextArea<'static>,
    visible: bool,
    result: DialogResult,
}

impl InputDialog {
    /// Create new input dialog
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        let mut input = TextArea::default();
        input.set_cursor_line_style(Style::default());
        input.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );

        Self {
            title: title.into(),
            prompt: prompt.into(),
            input,
            visible: true,
            result: DialogResult::Pending,
        }
    }

    /// Set default input value, cursor at the end.
    ///
    /// The input is one line, so line breaks in `default` become spaces and a
    /// confirmed, unedited multi-line default comes back flattened.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default: String = default.into();
        self.input.insert_str(default.replace(['\n', '\r'], " "));
        self
    }

    /// Current input text
    pub fn value(&self) -> String {
        self.input.lines().concat()
    }
}

impl Dialog for InputDialog {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let dialog_area = centered(area, 80, 9);
        let inner = frame_dialog(frame, dialog_area, &self.title, Color::Cyan);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Prompt
                Constraint::Length(3), // Input
                Constraint::Length(1), // Hint
            ])
            .split(inner);

        let prompt = Paragraph::new(self.prompt.as_str()).alignment(Alignment::Left);
        frame.render_widget(prompt, chunks[0]);
        frame.render_widget(&self.input, chunks[1]);
        frame.render_widget(hint("Enter: Confirm | Esc: Cancel"), chunks[2]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.result = DialogResult::ConfirmedWithInput(self.value());
                self.visible = false;
                true
            }
            KeyCode::Esc => {
                self.result = DialogResult::Cancelled;
                self.visible = false;
                true
            }
            _ => {
                self.input.input(key);
                false
            }
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn result(&self) -> DialogResult {
        self.result.clone()
    }
}

/// Alert dialog that must be acknowledged
pub struct AlertDialog {
    title: String,
    message: String,
    visible: bool,
    result: DialogResult,
}

impl AlertDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            visible: true,
            result: DialogResult::Pending,
        }
    }
}

impl Dialog for AlertDialog {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let dialog_area = centered(area, 70, 9);
        let inner = frame_dialog(frame, dialog_area, &self.title, Color::Red);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(2), Constraint::Length(1)])
            .split(inner);

        let message = Paragraph::new(self.message.as_str())
            .style(Style::default().fg(Color::LightRed))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center);
        frame.render_widget(message, chunks[0]);
        frame.render_widget(hint("Enter/Esc: OK"), chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                self.result = DialogResult::Confirmed;
                self.visible = false;
                true
            }
            _ => false,
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn result(&self) -> DialogResult {
        self.result.clone()
    }
}
