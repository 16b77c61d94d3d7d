//! UI bindings the widget renders into.
//!
//! The widget never looks anything up by itself: the host hands it one
//! reference per UI target when the widget is built.
//!
//! - [`MessageLog`]: the append-only, scrollable log (`chat-box`)
//! - [`InputField`]: the text input (`user-input`)
//! - [`Region`]: the example-questions block (`example-questions`)
//!
//! The [`html`] module provides in-memory implementations that render to
//! escaped HTML.

pub mod html;

pub use html::{HtmlLog, TextInput, ToggleRegion, escape_html};

use crate::message::ChatMessage;

/// Append-only log of chat entries with a scrollable viewport.
pub trait MessageLog: Send + Sync {
    /// Append an entry. The text is inserted as text, never as markup.
    fn append(&self, message: ChatMessage);

    /// Move the viewport to its maximum offset so the newest entry is visible.
    fn scroll_to_bottom(&self);
}

/// Text input holding the pending message.
pub trait InputField: Send + Sync {
    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    fn clear(&self) {
        self.set_value("");
    }
}

/// A block of UI that can be hidden.
pub trait Region: Send + Sync {
    fn hide(&self);

    fn is_hidden(&self) -> bool;
}
