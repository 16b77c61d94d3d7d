//! HTML rendering for the widget host page.
//!
//! The page is plain server-rendered HTML: forms post back to the server and
//! every response re-renders the whole widget. No client-side script is needed.
//!
//! # Structure
//!
//! - [`page`]: the widget page with its `chat-box`, `user-input` and
//!   `example-questions` elements

pub mod page;

pub use page::render_page;
