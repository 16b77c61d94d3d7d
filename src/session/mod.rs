//! Widget session management.
//!
//! Each open page gets its own [`WidgetSession`]: a log, an input field, an
//! example-questions region and a [`ChatWidget`](crate::widget::ChatWidget)
//! bound to them. Sessions live in memory only and are dropped after a period
//! of inactivity.
//!
//! # Example
//!
//! ```rust,ignore
//! use weatherwizard_widget::session::SessionStore;
//!
//! let store = SessionStore::new(transport);
//! let session = store.create();
//! session.submit_text("How is the weather in New York?").await?;
//!
//! assert_eq!(session.log().len(), 2);
//! ```

mod store;

pub use store::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TIMEOUT, SessionStore, WidgetSession};
