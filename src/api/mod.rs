//! Client side of the bot's HTTP API
//!
//! Provides:
//! - Config read/save as raw text
//! - Memory listing, deletion and editing
//! - The server-sent event stream (agent status, config reload notices)
//!
//! The session talks to the backend only through [`DashboardApi`], so panel
//! logic can be exercised without a server.

pub mod http;

pub use http::HttpApi;

use crate::error::Result;
use crate::stream::EventStream;
use crate::types::{MemoryPage, MemoryQuery};
use async_trait::async_trait;

/// Operations the dashboard performs against the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /api/config`: current configuration as raw text
    async fn get_config(&self) -> Result<String>;

    /// `POST /api/config` with a `text/plain` body
    async fn save_config(&self, body: String) -> Result<()>;

    /// `GET /api/memories` with the given filters
    async fn list_memories(&self, query: &MemoryQuery) -> Result<MemoryPage>;

    /// `DELETE /api/memories/{id}?server_id=`
    async fn delete_memory(&self, id: &str, server_id: &str) -> Result<()>;

    /// `PATCH /api/memories/{id}?server_id=` with `{"content": ...}`
    async fn update_memory(&self, id: &str, server_id: &str, content: String) -> Result<()>;

    /// Open `GET /api/events`. The returned stream reconnects on its own
    /// and ends only when the connection is given up.
    fn open_events(&self) -> Result<EventStream>;
}
