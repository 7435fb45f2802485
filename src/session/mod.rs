//! Dashboard session: the single owner of all client state
//!
//! A [`DashboardSession`] is created at startup, mutated only from the UI
//! loop and torn down with [`DashboardSession::shutdown`]. Operations never
//! block: each request runs as a tokio task and posts a [`SessionEvent`]
//! back over the session's channel. The UI loop feeds those into
//! [`DashboardSession::apply`].
//!
//! ```text
//! key press ──► operation ──► tokio task ──► backend
//!                                   │
//!                                   ▼
//!            apply() ◄── SessionEvent (mpsc)
//! ```
//!
//! Completions are applied in arrival order. A slow response to an older
//! memories query still replaces the table when it lands.

pub mod config_panel;
pub mod memories;
pub mod modal;
pub mod monitor;
pub mod status;


pub use config_panel::ConfigPanel;
pub use memories::{FilterForm, MemoriesPanel, MemoryField, MemoryRow, RowAction};
pub use modal::{ModalHost, ModalReply};
pub use monitor::{ConnectionState, MonitorPanel};
pub use status::{StatusKind, StatusLine, STATUS_CLEAR_AFTER};

use crate::api::DashboardApi;
use crate::error::Result;
use crate::stream::{StreamEvent, StreamHandle};
use crate::tui::widgets::dialogs::DialogResult;
use crate::types::MemoryPage;
use crate::utils::string::truncate_at_char_boundary;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The three dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Config,
    Memories,
    Monitor,
}

impl Tab {
    /// All tabs in display order
    pub fn all() -> [Tab; 3] {
        [Tab::Config, Tab::Memories, Tab::Monitor]
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Config => "Config",
            Tab::Memories => "Memories",
            Tab::Monitor => "Monitor",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Config => 0,
            Tab::Memories => 1,
            Tab::Monitor => 2,
        }
    }

    pub fn next(self) -> Tab {
        Tab::all()[(self.index() + 1) % 3]
    }

    pub fn prev(self) -> Tab {
        Tab::all()[(self.index() + 2) % 3]
    }
}

/// Completion of an async operation, delivered to the UI loop
#[derive(Debug)]
pub enum SessionEvent {
    ConfigLoaded(Result<String>),
    ConfigSaved(Result<()>),
    MemoriesLoaded {
        server_id: String,
        result: Result<MemoryPage>,
    },
    MemoryDeleted(Result<()>),
    MemoryEdited(Result<()>),
    /// Event from the stream opened as connection number `generation`
    Stream {
        generation: u64,
        event: StreamEvent,
    },
}

/// All dashboard state plus the handles needed to act on it
pub struct DashboardSession {
    api: Arc<dyn DashboardApi>,
    events: mpsc::UnboundedSender<SessionEvent>,
    active_tab: Tab,
    stream: Option<StreamHandle>,
    stream_generation: u64,
    pub config: ConfigPanel,
    pub memories: MemoriesPanel,
    pub monitor: MonitorPanel,
    pub modals: ModalHost,
}

impl DashboardSession {
    /// Create a session; the receiver must be drained into [`apply`](Self::apply)
    pub fn new(api: Arc<dyn DashboardApi>) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            api,
            events,
            active_tab: Tab::Config,
            stream: None,
            stream_generation: 0,
            config: ConfigPanel::new(),
            memories: MemoriesPanel::new(),
            monitor: MonitorPanel::new(),
            modals: ModalHost::new(),
        };
        (session, rx)
    }

    /// Initial state: config tab shown, event stream connected
    pub fn start(&mut self) {
        info!("Dashboard session starting");
        self.show_tab(Tab::Config);
        self.connect_stream();
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Make `tab` the visible pane; lazily loads the config on activation
    pub fn show_tab(&mut self, tab: Tab) {
        if self.active_tab != tab {
            debug!("Switching to {} tab", tab.title());
        }
        self.active_tab = tab;
        if tab == Tab::Config && self.config.needs_load() {
            self.load_config();
        }
    }

    /// Fetch the current config into the editor
    pub fn load_config(&mut self) {
        self.config.begin_load();
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.get_config().await;
            let _ = events.send(SessionEvent::ConfigLoaded(result));
        });
    }

    /// Send the editor's literal text as the new config. An editor that
    /// never received the backend's config is not sent.
    pub fn save_config(&mut self) {
        if !self.config.check_saveable() {
            return;
        }
        let body = self.config.text();
        debug!("Saving config ({} bytes)", body.len());
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.save_config(body).await;
            let _ = events.send(SessionEvent::ConfigSaved(result));
        });
    }

    /// Query memories with the current filter form
    pub fn load_memories(&mut self) {
        let query = match self.memories.form.to_query() {
            Ok(query) => query,
            Err(e) => {
                self.memories.reject(&e);
                return;
            }
        };

        self.memories.begin_load();
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = api.list_memories(&query).await;
            let _ = events.send(SessionEvent::MemoriesLoaded {
                server_id: query.server_id,
                result,
            });
        });
    }

    /// Delete the selected row after confirmation
    pub fn delete_selected(&mut self) {
        if let Some(action) = self.memories.selected_row().map(MemoryRow::delete_action) {
            self.run_action(action);
        }
    }

    /// Edit the selected row's content through a prompt
    pub fn edit_selected(&mut self) {
        if let Some(action) = self.memories.selected_row().map(MemoryRow::edit_action) {
            self.run_action(action);
        }
    }

    /// Run a row action. Both kinds ask the user first; the request is
    /// issued from a task once the modal resolves.
    pub fn run_action(&mut self, action: RowAction) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();

        match action {
            RowAction::Delete { id, server_id } => {
                let preview = self
                    .memories
                    .find_row(&id)
                    .map(|row| truncate_at_char_boundary(&row.cells()[1], 200));
                let answer = self
                    .modals
                    .confirm("Delete memory", "Delete this memory?", preview);
                tokio::spawn(async move {
                    if !matches!(answer.await, Ok(DialogResult::Confirmed)) {
                        debug!("Delete of {} cancelled", id);
                        return;
                    }
                    let result = api.delete_memory(&id, &server_id).await;
                    let _ = events.send(SessionEvent::MemoryDeleted(result));
                });
            }
            RowAction::Edit { id, server_id } => {
                let current = self
                    .memories
                    .find_row(&id)
                    .map(|row| row.content().to_string())
                    .unwrap_or_default();
                let answer = self
                    .modals
                    .prompt("Edit memory", "Edit memory content:", current);
                tokio::spawn(async move {
                    let content = match answer.await {
                        Ok(DialogResult::ConfirmedWithInput(content)) => content,
                        _ => {
                            debug!("Edit of {} cancelled", id);
                            return;
                        }
                    };
                    let result = api.update_memory(&id, &server_id, content).await;
                    let _ = events.send(SessionEvent::MemoryEdited(result));
                });
            }
        }
    }

    /// (Re)connect the event stream, closing any previous connection first
    pub fn connect_stream(&mut self) {
        let previous = self.stream.take();
        if previous.is_some() {
            debug!("Replacing previous event stream");
        }

        self.stream_generation += 1;
        let generation = self.stream_generation;
        self.monitor.connecting();
        match self.api.open_events() {
            Ok(stream) => {
                let events = self.events.clone();
                self.stream = Some(StreamHandle::spawn_after(previous, stream, move |event| {
                    events
                        .send(SessionEvent::Stream { generation, event })
                        .is_ok()
                }));
            }
            Err(e) => {
                warn!("Could not open event stream: {}", e);
                drop(previous);
                self.monitor.closed(&e.to_string());
            }
        }
    }

    /// Whether an event-stream connection is currently held
    pub fn is_stream_open(&self) -> bool {
        self.stream.as_ref().is_some_and(StreamHandle::is_open)
    }

    /// Apply a completion on the UI thread
    pub fn apply(&mut self, event: SessionEvent) {
        let now = Instant::now();
        match event {
            SessionEvent::ConfigLoaded(result) => self.config.apply_loaded(result),
            SessionEvent::ConfigSaved(result) => self.config.apply_saved(result, now),
            SessionEvent::MemoriesLoaded { server_id, result } => {
                self.memories.apply_page(&server_id, result)
            }
            SessionEvent::MemoryDeleted(result) => {
                self.after_row_action(result, "Delete")
            }
            SessionEvent::MemoryEdited(result) => self.after_row_action(result, "Edit"),
            SessionEvent::Stream { generation, event } => {
                if generation == self.stream_generation {
                    self.apply_stream(event, now);
                } else {
                    debug!("Dropping event from replaced stream #{}", generation);
                }
            }
        }
    }

    /// Reload on success; failures must be acknowledged
    fn after_row_action(&mut self, result: Result<()>, verb: &str) {
        match result {
            Ok(()) => self.load_memories(),
            Err(e) => {
                warn!("{} failed: {}", verb, e);
                let message = match e.server_message() {
                    Some(text) => format!("{} failed: {}", verb, text),
                    None => format!("{} failed.", verb),
                };
                let _ = self.modals.alert(format!("{} failed", verb), message);
            }
        }
    }

    fn apply_stream(&mut self, event: StreamEvent, now: Instant) {
        match event {
            StreamEvent::Opened => self.monitor.opened(),
            StreamEvent::Status(agents) => self.monitor.apply_snapshot(&agents),
            StreamEvent::ConfigReloaded => self.config.invalidate(now),
            StreamEvent::Disconnected(_) => self.monitor.reconnecting(),
            StreamEvent::Closed => {
                self.stream = None;
                self.monitor.closed("Disconnected.");
            }
        }
    }

    /// Clear expired transient status messages
    pub fn tick(&mut self, now: Instant) {
        self.config.status.expire(now);
        self.memories.status.expire(now);
        self.monitor.status.expire(now);
    }

    /// Close the event stream and cancel pending modals
    pub fn shutdown(&mut self) {
        info!("Dashboard session shutting down");
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
        self.modals.cancel_all();
    }
}
