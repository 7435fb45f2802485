//! Keyboard polling

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Input the UI loop reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Nothing arrived within one tick
    Tick,
    Quit,
}

/// Blocking poll with a fixed tick
#[derive(Debug, Clone)]
pub struct EventLoop {
    tick_rate: Duration,
}

impl EventLoop {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Wait up to one tick for input
    pub fn poll_event(&self) -> Result<TuiEvent> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Self::classify(key));
                }
                Event::Resize(w, h) => return Ok(TuiEvent::Resize(w, h)),
                _ => {}
            }
        }
        Ok(TuiEvent::Tick)
    }

    /// Ctrl+C and Ctrl+Q quit from anywhere, modals included
    pub fn classify(key: KeyEvent) -> TuiEvent {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => TuiEvent::Quit,
            _ => TuiEvent::Key(key),
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
