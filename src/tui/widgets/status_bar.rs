//! One-line footer: key hints on the left, a badge on the right

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    badge: Option<Span<'a>>,
    style: Style,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            badge: None,
            style: Style::default().bg(Color::DarkGray).fg(Color::White),
        }
    }

    /// Add a `key action` hint
    pub fn hint(mut self, key: &'a str, action: &'a str) -> Self {
        self.hints.push((key, action));
        self
    }

    /// Right-aligned text, drawn over the hints if space runs out
    pub fn badge(mut self, text: &'a str, color: Color) -> Self {
        self.badge = Some(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        self
    }

    fn hint_line(&self) -> Line<'a> {
        let mut spans = Vec::with_capacity(self.hints.len() * 3);
        for (i, (key, action)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(" {}", action)));
        }
        Line::from(spans)
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.hint_line())
            .style(self.style)
            .render(area, buf);

        if let Some(badge) = self.badge {
            Paragraph::new(Line::from(vec![badge, Span::raw(" ")]))
                .alignment(Alignment::Right)
                .render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_hints_and_badge() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hint("F1", "config")
            .hint("^Q", "quit")
            .badge("connected", Color::Green)
            .render(area, &mut buf);

        let text = row_text(&buf, 40);
        assert!(text.starts_with("F1 config  ^Q quit"));
        assert!(text.trim_end().ends_with("connected"));
    }
}
