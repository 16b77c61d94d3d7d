//! In-memory view targets rendered as HTML.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{InputField, MessageLog, Region};
use crate::message::{ChatMessage, Labels};

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[derive(Debug, Default)]
struct LogState {
    entries: Vec<ChatMessage>,
    /// Viewport offset, measured in entries.
    scroll_top: usize,
}

/// Message log kept in memory and rendered as `<p>` fragments.
///
/// Scroll offsets are measured in entries: `scroll_height` is the number of
/// entries and a log scrolled to the bottom has `scroll_top == scroll_height`.
#[derive(Debug, Default)]
pub struct HtmlLog {
    state: RwLock<LogState>,
}

impl HtmlLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in order.
    pub fn entries(&self) -> Vec<ChatMessage> {
        self.state.read().unwrap().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scroll_top(&self) -> usize {
        self.state.read().unwrap().scroll_top
    }

    pub fn scroll_height(&self) -> usize {
        self.len()
    }

    /// Whether the newest entry is in view.
    pub fn is_scrolled_to_bottom(&self) -> bool {
        let state = self.state.read().unwrap();
        state.scroll_top == state.entries.len()
    }

    /// Render every entry as `<p><strong>Label:</strong> text</p>`.
    pub fn render(&self, labels: &Labels) -> String {
        let state = self.state.read().unwrap();
        state
            .entries
            .iter()
            .map(|entry| render_entry(labels, entry))
            .collect()
    }
}

fn render_entry(labels: &Labels, entry: &ChatMessage) -> String {
    format!(
        r#"<p class="{class}"><strong>{label}:</strong> {text}</p>"#,
        class = entry.sender.css_class(),
        label = escape_html(labels.for_sender(entry.sender)),
        text = escape_html(&entry.text),
    )
}

impl MessageLog for HtmlLog {
    fn append(&self, message: ChatMessage) {
        self.state.write().unwrap().entries.push(message);
    }

    fn scroll_to_bottom(&self) {
        let mut state = self.state.write().unwrap();
        state.scroll_top = state.entries.len();
    }
}

/// Input field value kept in memory.
#[derive(Debug, Default)]
pub struct TextInput {
    value: RwLock<String>,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputField for TextInput {
    fn value(&self) -> String {
        self.value.read().unwrap().clone()
    }

    fn set_value(&self, value: &str) {
        let mut guard = self.value.write().unwrap();
        guard.clear();
        guard.push_str(value);
    }
}

/// Region visibility flag. Visible until hidden; never shown again.
#[derive(Debug, Default)]
pub struct ToggleRegion {
    hidden: AtomicBool,
}

impl ToggleRegion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Region for ToggleRegion {
    fn hide(&self) {
        self.hidden.store(true, Ordering::Release);
    }

    fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::Acquire)
    }
}
