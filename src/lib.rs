//! Weatherwizard chat widget
//!
//! A small chat widget that takes user text, posts it to a chat endpoint as
//! `{"message": ...}` and renders the `{"message": ...}` reply, plus an Axum
//! host that serves the widget as an HTML page.
//!
//! # Architecture
//!
//! - **Widget**: renders into injected UI targets and talks through a transport
//! - **Transport**: JSON over HTTP to the external `/send-message` endpoint
//! - **Server**: Axum host keeping one widget per open page
//!
//! # Modules
//!
//! - [`widget`]: the chat widget and its example questions
//! - [`view`]: UI target traits and in-memory HTML implementations
//! - [`transport`]: endpoint transport trait and HTTP client
//! - [`message`]: log entries and wire types
//! - [`session`]: per-page widget sessions
//! - [`ui`]: page rendering
//! - [`server`]: Axum router and startup

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod message;
pub mod server;
pub mod session;
pub mod transport;
pub mod ui;
pub mod view;
pub mod widget;

use crate::config::AppConfig;
use crate::message::Labels;

use session::SessionStore;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Open widget sessions.
    pub sessions: SessionStore,
    /// Sender labels, resolved once from the config.
    pub labels: Arc<Labels>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, sessions: SessionStore) -> Self {
        let labels = Arc::new(config.widget.labels());
        Self {
            sessions,
            labels,
            config,
        }
    }
}
