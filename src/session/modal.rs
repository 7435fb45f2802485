//! Modal host: non-blocking confirm / prompt / alert
//!
//! Each request returns a `oneshot::Receiver` that resolves with the user's
//! answer, so callers can `.await` a decision from a spawned task while the
//! UI loop keeps running. While any modal is open the host owns all key
//! input; further requests queue behind the visible one.

use crate::tui::widgets::dialogs::{AlertDialog, ConfirmDialog, Dialog, DialogResult, InputDialog};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::collections::VecDeque;
use tokio::sync::oneshot;
use tracing::debug;

/// Answer to a modal request; resolves to `Cancelled` if the host goes away
pub type ModalReply = oneshot::Receiver<DialogResult>;

struct PendingModal {
    message: String,
    dialog: Box<dyn Dialog>,
    reply: oneshot::Sender<DialogResult>,
}

/// Queue of modal dialogs, front one visible
#[derive(Default)]
pub struct ModalHost {
    queue: VecDeque<PendingModal>,
}

impl std::fmt::Debug for ModalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalHost")
            .field("open", &self.queue.len())
            .finish()
    }
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask a yes/no question
    pub fn confirm(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        preview: Option<String>,
    ) -> ModalReply {
        let message = message.into();
        let mut dialog = ConfirmDialog::new(title, message.clone());
        if let Some(preview) = preview {
            dialog = dialog.with_preview(preview);
        }
        self.push(message, Box::new(dialog))
    }

    /// Ask for a line of text, prefilled with `default`
    pub fn prompt(
        &mut self,
        title: impl Into<String>,
        prompt: impl Into<String>,
        default: impl Into<String>,
    ) -> ModalReply {
        let prompt = prompt.into();
        let dialog = InputDialog::new(title, prompt.clone()).with_default(default);
        self.push(prompt, Box::new(dialog))
    }

    /// Show a message that must be acknowledged
    pub fn alert(&mut self, title: impl Into<String>, message: impl Into<String>) -> ModalReply {
        let message = message.into();
        self.push(message.clone(), Box::new(AlertDialog::new(title, message)))
    }

    fn push(&mut self, message: String, dialog: Box<dyn Dialog>) -> ModalReply {
        let (reply, answer) = oneshot::channel();
        self.queue.push_back(PendingModal {
            message,
            dialog,
            reply,
        });
        debug!("Modal opened ({} queued)", self.queue.len());
        answer
    }

    /// Whether a modal currently captures input
    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Message or prompt of the visible modal
    pub fn current_message(&self) -> Option<&str> {
        self.queue.front().map(|modal| modal.message.as_str())
    }

    /// Number of open and queued modals
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Route a key to the visible modal; closes it when the dialog is done
    pub fn handle_key(&mut self, key: KeyEvent) {
        let Some(front) = self.queue.front_mut() else {
            return;
        };
        if front.dialog.handle_key(key) {
            let result = front.dialog.result();
            self.finish(result);
        }
    }

    /// Answer the visible modal directly
    pub fn resolve(&mut self, result: DialogResult) {
        if self.is_open() {
            self.finish(result);
        }
    }

    /// Cancel every open and queued modal
    pub fn cancel_all(&mut self) {
        while self.is_open() {
            self.finish(DialogResult::Cancelled);
        }
    }

    fn finish(&mut self, result: DialogResult) {
        if let Some(modal) = self.queue.pop_front() {
            debug!("Modal closed with {:?}", result);
            // Receiver may already be gone (fire-and-forget alerts)
            let _ = modal.reply.send(result);
        }
    }

    /// Draw the visible modal over `area`
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(front) = self.queue.front() {
            front.dialog.render(frame, area);
        }
    }
}
