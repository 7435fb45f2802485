//! Per-panel status line with optional auto-clear

use std::time::{Duration, Instant};

/// How long transient success messages stay visible
pub const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(3);

/// Styling class of a status message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusKind {
    #[default]
    Neutral,
    Error,
}

/// One line of panel feedback.
///
/// Every message carries its own expiry, so clearing an old transient
/// message can never wipe a newer one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    kind: StatusKind,
    expires_at: Option<Instant>,
}

impl StatusLine {
    /// Neutral message that stays until replaced
    pub fn info(&mut self, text: impl Into<String>) {
        self.set(text.into(), StatusKind::Neutral, None);
    }

    /// Error message that stays until replaced
    pub fn error(&mut self, text: impl Into<String>) {
        self.set(text.into(), StatusKind::Error, None);
    }

    /// Neutral message that clears itself after [`STATUS_CLEAR_AFTER`]
    pub fn flash(&mut self, text: impl Into<String>, now: Instant) {
        self.set(text.into(), StatusKind::Neutral, Some(now + STATUS_CLEAR_AFTER));
    }

    pub fn clear(&mut self) {
        self.set(String::new(), StatusKind::Neutral, None);
    }

    /// Drop the message if its time is up. Returns whether it was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    fn set(&mut self, text: String, kind: StatusKind, expires_at: Option<Instant>) {
        self.text = text;
        self.kind = kind;
        self.expires_at = expires_at;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_expires_after_three_seconds() {
        let now = Instant::now();
        let mut status = StatusLine::default();
        status.flash("Saved.", now);

        assert!(!status.expire(now + Duration::from_millis(2999)));
        assert_eq!(status.text(), "Saved.");

        assert!(status.expire(now + STATUS_CLEAR_AFTER));
        assert!(status.is_empty());
    }

    #[test]
    fn test_error_never_expires() {
        let now = Instant::now();
        let mut status = StatusLine::default();
        status.error("Failed to load config");

        assert!(!status.expire(now + Duration::from_secs(3600)));
        assert!(status.is_error());
        assert_eq!(status.text(), "Failed to load config");
    }

    #[test]
    fn test_newer_message_keeps_its_own_deadline() {
        let now = Instant::now();
        let mut status = StatusLine::default();
        status.flash("Saved.", now);
        status.error("bad syntax");

        assert!(!status.expire(now + Duration::from_secs(5)));
        assert_eq!(status.text(), "bad syntax");
    }
}
