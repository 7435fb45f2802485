//! mnemon-dash - terminal dashboard for the mnemon bot
//!
//! Administers a running bot over its HTTP API:
//! - **Config**: view and edit the bot's raw TOML configuration
//! - **Memories**: search, edit and delete stored memories per server
//! - **Monitor**: live agent activity over a server-sent event stream
//!
//! # Architecture
//!
//! - [`api`]: the [`DashboardApi`] seam and its reqwest implementation
//! - [`stream`]: SSE subscription and the connection handle
//! - [`session`]: all client state; async completions flow back as events
//! - [`tui`] and [`app`]: drawing and key routing
//!
//! # Example
//!
//! ```ignore
//! use mnemon_dash::{DashConfig, DashboardSession, HttpApi};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashConfig::load(None)?;
//!     let api = HttpApi::from_config(&config)?;
//!     let (mut session, mut events) = DashboardSession::new(Arc::new(api));
//!
//!     session.start();
//!     while let Some(event) = events.recv().await {
//!         session.apply(event);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod session;
pub mod stream;
pub mod tui;
pub mod types;
pub mod utils;

pub use api::{DashboardApi, HttpApi};
pub use config::DashConfig;
pub use error::{DashError, Result};
pub use session::{DashboardSession, SessionEvent, Tab};
pub use stream::{StreamEvent, StreamHandle};
pub use types::{AgentStatus, Memory, MemoryPage, MemoryQuery};
