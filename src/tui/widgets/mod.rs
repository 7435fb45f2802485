//! Reusable widgets

pub mod dialogs;
mod status_bar;

pub use status_bar::StatusBar;
