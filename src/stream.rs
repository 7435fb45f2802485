//! Server-sent event subscription
//!
//! Subscribes to the backend's `/api/events` endpoint and turns the raw SSE
//! feed into [`StreamEvent`]s:
//!
//! ```text
//! backend ──SSE──► eventsource-client ──► StreamEvent ──► forwarder task ──► session
//! ```
//!
//! # Reconnection
//!
//! The eventsource client retries on its own with exponential backoff
//! (initial delay and cap from [`ReconnectSettings`]). Each failed attempt
//! surfaces as [`StreamEvent::Disconnected`], each successful (re)connect as
//! [`StreamEvent::Opened`]. Nothing else reconnects: a [`StreamHandle`] is
//! only replaced when the user asks for a new connection.

use crate::error::{DashError, Result};
use crate::types::AgentStatus;
use eventsource_client as es;
use eventsource_client::Client as _;
use std::pin::Pin;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

/// Named event carrying the full agent list
pub const STATUS_EVENT: &str = "status";

/// Named event sent after the backend reloaded its configuration
pub const CONFIG_RELOADED_EVENT: &str = "config_reloaded";

/// Decoded stream of dashboard events
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Something the event stream reported
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Connection (re)established
    Opened,
    /// Full snapshot of active agents
    Status(Vec<AgentStatus>),
    /// Backend reloaded its configuration
    ConfigReloaded,
    /// Connection failed or dropped; the client is retrying
    Disconnected(String),
    /// Stream ended for good
    Closed,
}

/// Backoff settings for the underlying eventsource client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectSettings {
    pub delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Open an SSE subscription to `url`.
///
/// Fails only if the client cannot be built (malformed URL). Connection
/// problems are reported through the stream itself.
pub fn subscribe(url: &str, settings: ReconnectSettings) -> Result<EventStream> {
    debug!("Subscribing to event stream: {}", url);

    let reconnect = es::ReconnectOptions::reconnect(true)
        .retry_initial(true)
        .delay(settings.delay)
        .backoff_factor(2)
        .delay_max(settings.max_delay)
        .build();

    let client = es::ClientBuilder::for_url(url)
        .map_err(|e| DashError::Stream(format!("failed to build client for {}: {}", url, e)))?
        .reconnect(reconnect)
        .build();

    let stream = client.stream().filter_map(|item| match item {
        Ok(es::SSE::Connected(_)) => {
            info!("Event stream connected");
            Some(StreamEvent::Opened)
        }
        Ok(es::SSE::Event(event)) => parse_event(&event.event_type, &event.data),
        Ok(es::SSE::Comment(_)) => {
            debug!("Event stream keepalive");
            None
        }
        Err(e) => {
            warn!("Event stream error: {}", e);
            Some(StreamEvent::Disconnected(e.to_string()))
        }
    });

    Ok(Box::pin(stream))
}

/// Decode one named SSE event.
///
/// Unknown event types and malformed `status` payloads are dropped; a
/// `null` status payload means no agents.
pub fn parse_event(event_type: &str, data: &str) -> Option<StreamEvent> {
    match event_type {
        STATUS_EVENT => match serde_json::from_str::<Option<Vec<AgentStatus>>>(data) {
            Ok(agents) => Some(StreamEvent::Status(agents.unwrap_or_default())),
            Err(e) => {
                warn!("Ignoring malformed status event: {}", e);
                None
            }
        },
        CONFIG_RELOADED_EVENT => Some(StreamEvent::ConfigReloaded),
        other => {
            debug!("Ignoring event type '{}'", other);
            None
        }
    }
}

/// Owner of the task that pumps an [`EventStream`].
///
/// Dropping or closing the handle aborts the task, which drops the stream
/// and with it the HTTP connection.
#[derive(Debug)]
pub struct StreamHandle {
    task: Option<JoinHandle<()>>,
}

impl StreamHandle {
    /// Spawn a task that hands every event to `forward`.
    ///
    /// `forward` returns `false` when nobody is listening anymore, which
    /// stops the task. When the stream ends on its own, `forward` receives
    /// a final [`StreamEvent::Closed`].
    pub fn spawn<F>(stream: EventStream, forward: F) -> Self
    where
        F: FnMut(StreamEvent) -> bool + Send + 'static,
    {
        Self::spawn_after(None, stream, forward)
    }

    /// Like [`spawn`](Self::spawn), replacing `previous`.
    ///
    /// The previous task is aborted and fully torn down before `stream` is
    /// first polled. The eventsource client only connects on first poll, so
    /// the old connection is gone before the new one is opened.
    pub fn spawn_after<F>(
        previous: Option<StreamHandle>,
        mut stream: EventStream,
        mut forward: F,
    ) -> Self
    where
        F: FnMut(StreamEvent) -> bool + Send + 'static,
    {
        let previous = previous.and_then(|mut handle| handle.task.take());
        let task = tokio::spawn(async move {
            if let Some(previous) = previous {
                previous.abort();
                let _ = previous.await;
                debug!("Previous event stream closed");
            }

            while let Some(event) = stream.next().await {
                if !forward(event) {
                    debug!("Event stream receiver gone, stopping");
                    return;
                }
            }
            info!("Event stream ended");
            forward(StreamEvent::Closed);
        });

        Self { task: Some(task) }
    }

    /// Whether the pump task is still running
    pub fn is_open(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Close the connection
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
