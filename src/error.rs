//! Error types for the mnemon dashboard
//!
//! `DashError` covers everything the library can fail with: input validation,
//! transport failures, application errors reported by the backend, payload
//! decoding and configuration loading. The binary wraps it in `anyhow`.

use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashError {
    /// A required input was missing or malformed; no request was made
    #[error("{0}")]
    Validation(String),

    /// HTTP request never produced a response (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status; body is kept verbatim
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Event stream could not be opened
    #[error("Event stream error: {0}")]
    Stream(String),

    /// API base URL could not be parsed or extended
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Server-provided error text, if the backend sent any.
    ///
    /// Empty bodies count as absent so callers fall back to their own
    /// generic message.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DashError::Server { body, .. } => {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }
}
