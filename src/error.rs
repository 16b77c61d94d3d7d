//! Error types for the widget.

use thiserror::Error;

/// A request to the chat endpoint failed.
///
/// Callers treat every variant as the same failure: the user's message stays in
/// the log and no reply is rendered. The variants only keep the cause around for
/// diagnostics.
#[derive(Error, Debug)]
pub enum SendError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body was not `{"message": string}`.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for endpoint calls.
pub type Result<T> = std::result::Result<T, SendError>;
