//! Monitor panel: live agent table fed by the event stream

use super::status::StatusLine;
use crate::types::{format_local_time, AgentStatus};
use crate::utils::string::sanitize_cell;

/// Lifecycle of the event-stream connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
        }
    }
}

/// Monitor tab state
#[derive(Debug, Default)]
pub struct MonitorPanel {
    state: ConnectionState,
    rows: Vec<[String; 4]>,
    pub status: StatusLine,
}

impl MonitorPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Display cells per agent: channel, server, last active, queue depth
    pub fn rows(&self) -> &[[String; 4]] {
        &self.rows
    }

    pub(crate) fn connecting(&mut self) {
        self.state = ConnectionState::Connecting;
        self.status.info("Connecting...");
    }

    pub(crate) fn opened(&mut self) {
        self.state = ConnectionState::Connected;
        self.status.info("Connected.");
    }

    pub(crate) fn reconnecting(&mut self) {
        self.state = ConnectionState::Reconnecting;
        self.status.error("Reconnecting...");
    }

    pub(crate) fn closed(&mut self, reason: &str) {
        self.state = ConnectionState::Disconnected;
        self.status.error(reason);
    }

    /// Replace the table with a fresh snapshot
    pub(crate) fn apply_snapshot(&mut self, agents: &[AgentStatus]) {
        self.rows = agents
            .iter()
            .map(|agent| {
                [
                    sanitize_cell(&agent.channel_id),
                    sanitize_cell(&agent.server_id),
                    format_local_time(agent.last_active.as_ref()),
                    agent.queue_depth.to_string(),
                ]
            })
            .collect();

        if self.rows.is_empty() {
            self.status.info("No active agents.");
        } else {
            self.status
                .info(format!("{} active agent(s).", self.rows.len()));
        }
    }
}
