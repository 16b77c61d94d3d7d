//! Chat log entries and the `/send-message` wire format.

use serde::{Deserialize, Serialize};

/// Who authored a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The person typing into the widget.
    User,
    /// The remote endpoint's reply.
    Assistant,
}

impl Sender {
    /// CSS class used when rendering an entry from this sender.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "message-user",
            Self::Assistant => "message-assistant",
        }
    }
}

/// A single entry in the visual log.
///
/// Entries are created once and never mutated. `text` is untrusted and is only
/// ever rendered as escaped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    /// Create a message typed by the user.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a reply from the endpoint.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }
}

/// Sender labels shown in front of every entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub user: String,
    pub assistant: String,
}

impl Labels {
    /// Label for `sender`, without the trailing colon.
    #[must_use]
    pub fn for_sender(&self, sender: Sender) -> &str {
        match sender {
            Sender::User => self.user.as_str(),
            Sender::Assistant => self.assistant.as_str(),
        }
    }

    /// Plain-text rendering of an entry, e.g. `You: hello`.
    #[must_use]
    pub fn line(&self, message: &ChatMessage) -> String {
        format!("{}: {}", self.for_sender(message.sender), message.text)
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            user: "You".to_string(),
            assistant: "Weatherwizard".to_string(),
        }
    }
}

/// Request body for `POST /send-message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Response body for `POST /send-message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: String,
}
