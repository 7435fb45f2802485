//! Key routing and the UI loop

use crate::session::{DashboardSession, MemoryField, SessionEvent, Tab};
use crate::tui::{views, EventLoop, TuiEvent};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

/// A session plus the channel its completions arrive on
pub struct App {
    pub session: DashboardSession,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    quit: bool,
}

impl App {
    pub fn new(session: DashboardSession, events: mpsc::UnboundedReceiver<SessionEvent>) -> Self {
        Self {
            session,
            events,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Apply every completion that has arrived so far
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.session.apply(event);
        }
    }

    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Quit => self.quit = true,
            TuiEvent::Key(key) => self.handle_key(key),
            TuiEvent::Resize(..) | TuiEvent::Tick => {}
        }
    }

    /// Route one key press. An open modal takes everything.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.session.modals.is_open() {
            self.session.modals.handle_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::F(1) => return self.session.show_tab(Tab::Config),
            KeyCode::F(2) => return self.session.show_tab(Tab::Memories),
            KeyCode::F(3) => return self.session.show_tab(Tab::Monitor),
            KeyCode::Left if ctrl => {
                let tab = self.session.active_tab().prev();
                return self.session.show_tab(tab);
            }
            KeyCode::Right if ctrl => {
                let tab = self.session.active_tab().next();
                return self.session.show_tab(tab);
            }
            KeyCode::Char('r') if ctrl => {
                debug!("Manual reconnect");
                return self.session.connect_stream();
            }
            _ => {}
        }

        match self.session.active_tab() {
            Tab::Config => self.config_key(key, ctrl),
            Tab::Memories => self.memories_key(key),
            Tab::Monitor => {
                if key.code == KeyCode::Char('q') {
                    self.quit = true;
                }
            }
        }
    }

    fn config_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl && key.code == KeyCode::Char('s') {
            self.session.save_config();
        } else if self.session.config.is_loaded() {
            self.session.config.editor_mut().input(key);
        }
    }

    fn memories_key(&mut self, key: KeyEvent) {
        let memories = &mut self.session.memories;
        match key.code {
            KeyCode::Tab => {
                memories.focus = memories.focus.next();
                return;
            }
            KeyCode::BackTab => {
                memories.focus = memories.focus.prev();
                return;
            }
            _ => {}
        }

        if memories.focus == MemoryField::Table {
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => memories.select_next(),
                KeyCode::Up | KeyCode::Char('k') => memories.select_prev(),
                KeyCode::Char('e') | KeyCode::Enter => self.session.edit_selected(),
                KeyCode::Char('d') | KeyCode::Delete => self.session.delete_selected(),
                KeyCode::Char('r') => self.session.load_memories(),
                _ => {}
            }
            return;
        }

        if key.code == KeyCode::Enter {
            self.session.load_memories();
        } else if let Some(input) = memories.form.input_mut(memories.focus) {
            input.input(key);
        }
    }
}

/// Draw, poll one tick of input, apply completions, expire statuses; until quit
pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, input: &EventLoop) -> Result<()> {
    loop {
        terminal.draw(|frame| views::render(frame, &mut app.session))?;

        let event = input.poll_event()?;
        app.handle_event(event);
        if app.should_quit() {
            debug!("Quit requested");
            return Ok(());
        }

        app.drain_events();
        app.session.tick(Instant::now());
    }
}
