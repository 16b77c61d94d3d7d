//! The chat widget: capture input, render it, ask the endpoint, render the reply.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use weatherwizard_widget::view::{HtmlLog, TextInput, ToggleRegion};
//! use weatherwizard_widget::widget::{ChatWidget, Submission, WidgetBindings};
//! use weatherwizard_widget::transport::MessageTransport;
//!
//! struct Sunny;
//!
//! #[async_trait]
//! impl MessageTransport for Sunny {
//!     async fn send(&self, _message: &str) -> weatherwizard_widget::error::Result<String> {
//!         Ok("Sunny, 25°C".to_string())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let log = Arc::new(HtmlLog::new());
//! let bindings = WidgetBindings {
//!     log: Arc::<HtmlLog>::clone(&log),
//!     input: Arc::new(TextInput::new()),
//!     examples: Arc::new(ToggleRegion::new()),
//! };
//! let widget = ChatWidget::new(bindings, Arc::new(Sunny));
//!
//! let outcome = widget.submit_user_message("How is the weather in New York?").await;
//! assert!(matches!(outcome, Ok(Submission::Answered(_))));
//! assert_eq!(log.len(), 2);
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::Result;
use crate::message::ChatMessage;
use crate::transport::MessageTransport;
use crate::view::{InputField, MessageLog, Region};

/// Preset prompts offered before the first message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleQuestion {
    NewYork,
    BerlinHourly,
    LondonWeek,
    DubaiDayAfterTomorrow,
}

impl ExampleQuestion {
    pub const ALL: [Self; 4] = [
        Self::NewYork,
        Self::BerlinHourly,
        Self::LondonWeek,
        Self::DubaiDayAfterTomorrow,
    ];

    /// The literal text submitted for this example.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::NewYork => "How is the weather in New York?",
            Self::BerlinHourly => {
                "How is the temperature tomorrow in Berlin, can you give it hourly?"
            }
            Self::LondonWeek => "How is the weather this week in London?",
            Self::DubaiDayAfterTomorrow => "How is the weather in Dubai the day after tomorrow?",
        }
    }

    /// 1-based position, as used in routes.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::NewYork => 1,
            Self::BerlinHourly => 2,
            Self::LondonWeek => 3,
            Self::DubaiDayAfterTomorrow => 4,
        }
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.number() == number)
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Input was empty after trimming; nothing was rendered or sent.
    Skipped,
    /// The endpoint replied and the reply was rendered.
    Answered(ChatMessage),
}

/// The three UI targets a widget renders into.
#[derive(Clone)]
pub struct WidgetBindings {
    /// Message log (`chat-box`).
    pub log: Arc<dyn MessageLog>,
    /// Text input (`user-input`).
    pub input: Arc<dyn InputField>,
    /// Example-questions block (`example-questions`).
    pub examples: Arc<dyn Region>,
}

impl fmt::Debug for WidgetBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBindings").finish_non_exhaustive()
    }
}

/// Chat widget bound to a set of UI targets and a transport.
///
/// Submissions take `&self`, so several can be in flight at once. Replies are
/// rendered in the order they arrive.
#[derive(Clone)]
pub struct ChatWidget {
    bindings: WidgetBindings,
    transport: Arc<dyn MessageTransport>,
}

impl fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWidget")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl ChatWidget {
    #[must_use]
    pub fn new(bindings: WidgetBindings, transport: Arc<dyn MessageTransport>) -> Self {
        Self {
            bindings,
            transport,
        }
    }

    /// Send whatever is currently in the input field.
    pub async fn submit_from_input(&self) -> Result<Submission> {
        let text = self.bindings.input.value();
        self.submit_user_message(&text).await
    }

    /// Send one of the preset example questions.
    pub async fn submit_example_question(&self, question: ExampleQuestion) -> Result<Submission> {
        self.submit_user_message(question.text()).await
    }

    /// Render `text` as a user entry, send it, and render the reply.
    ///
    /// Whitespace-only input is ignored. Otherwise the input is cleared and the
    /// example questions are hidden before the reply is awaited, so both hold
    /// whatever the outcome. On failure the user entry stays, nothing else is
    /// rendered and the error is logged and returned.
    pub async fn submit_user_message(&self, text: &str) -> Result<Submission> {
        if text.trim().is_empty() {
            debug!(name: "widget.submit.skipped", "Ignoring empty message");
            return Ok(Submission::Skipped);
        }

        self.bindings.log.append(ChatMessage::user(text));
        self.bindings.input.clear();
        self.bindings.examples.hide();

        info!(
            name: "widget.submit.sent",
            chars = text.chars().count(),
            "Message sent to chat endpoint"
        );

        match self.transport.send(text).await {
            Ok(reply) => {
                let message = ChatMessage::assistant(reply);
                self.bindings.log.append(message.clone());
                self.bindings.log.scroll_to_bottom();
                Ok(Submission::Answered(message))
            }
            Err(err) => {
                error!(
                    name: "widget.reply.failed",
                    error = %err,
                    "Chat endpoint request failed"
                );
                Err(err)
            }
        }
    }
}
