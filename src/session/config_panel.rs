//! Config panel: raw-text editor over `GET`/`POST /api/config`

use super::status::StatusLine;
use crate::error::Result;
use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders},
};
use std::time::Instant;
use tracing::{debug, warn};
use tui_textarea::TextArea;

const LOAD_FAILED: &str = "Failed to load config";
const SAVE_FAILED: &str = "Save failed";
pub const NOT_LOADED: &str = "Config not loaded";

/// Editor state plus the lazy-load bookkeeping for the config tab
pub struct ConfigPanel {
    editor: TextArea<'static>,
    loaded: bool,
    loading: bool,
    /// A reload notice arrived while a fetch was in flight
    stale: bool,
    pub status: StatusLine,
}

impl ConfigPanel {
    pub fn new() -> Self {
        Self {
            editor: Self::editor_with(""),
            loaded: false,
            loading: false,
            stale: false,
            status: StatusLine::default(),
        }
    }

    fn editor_with(text: &str) -> TextArea<'static> {
        let lines: Vec<String> = text
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();
        let mut editor = TextArea::new(lines);
        editor.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(" config ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        editor.set_line_number_style(Style::default().fg(Color::DarkGray));
        editor
    }

    /// Loaded this activation cycle
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A fetch is due: not loaded and none in flight
    pub fn needs_load(&self) -> bool {
        !self.loaded && !self.loading
    }

    pub(crate) fn begin_load(&mut self) {
        self.loading = true;
    }

    /// The editor's literal contents
    pub fn text(&self) -> String {
        self.editor.lines().join("\n")
    }

    /// Replace the editor contents
    pub fn set_text(&mut self, text: &str) {
        self.editor = Self::editor_with(text);
    }

    pub fn editor(&self) -> &TextArea<'static> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.editor
    }

    /// Apply a fetch result. A fetch overtaken by a reload notice still
    /// fills the editor but leaves the panel unloaded, so the next
    /// activation fetches again.
    pub(crate) fn apply_loaded(&mut self, result: Result<String>) {
        self.loading = false;
        let stale = std::mem::take(&mut self.stale);
        match result {
            Ok(text) => {
                debug!("Config loaded ({} bytes, stale: {})", text.len(), stale);
                self.set_text(&text);
                self.loaded = !stale;
                if self.status.is_error() {
                    self.status.clear();
                }
            }
            Err(e) => {
                warn!("Config load failed: {}", e);
                self.status.error(LOAD_FAILED);
            }
        }
    }

    /// Refuse to save an editor that never received the backend's config
    pub(crate) fn check_saveable(&mut self) -> bool {
        if !self.loaded {
            warn!("Refusing to save config that was never loaded");
            self.status.error(NOT_LOADED);
        }
        self.loaded
    }

    pub(crate) fn apply_saved(&mut self, result: Result<()>, now: Instant) {
        match result {
            Ok(()) => self.status.flash("Saved.", now),
            Err(e) => {
                warn!("Config save failed: {}", e);
                self.status.error(e.server_message().unwrap_or(SAVE_FAILED));
            }
        }
    }

    /// Backend reloaded its config: refetch on next activation
    pub(crate) fn invalidate(&mut self, now: Instant) {
        self.loaded = false;
        self.stale = self.loading;
        self.status.flash("Config reloaded!", now);
    }
}

impl Default for ConfigPanel {
    fn default() -> Self {
        Self::new()
    }
}
