//! Terminal UI for the dashboard
//!
//! - [`terminal`]: raw mode / alternate screen setup and restore
//! - [`events`]: key polling with a fixed tick
//! - [`views`]: draws a [`DashboardSession`](crate::session::DashboardSession)
//! - [`widgets`]: dialogs and the footer status bar

pub mod events;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use events::{EventLoop, TuiEvent};
pub use terminal::TerminalManager;
