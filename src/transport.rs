//! Transport to the remote chat endpoint.
//!
//! The widget only needs one call: send the user's text, get the reply text
//! back. [`MessageTransport`] is that seam; [`HttpTransport`] is the real
//! implementation speaking JSON over HTTP.

use async_trait::async_trait;
use url::Url;

use crate::error::{Result, SendError};
use crate::message::{SendMessageRequest, SendMessageResponse};

/// Default path of the endpoint, relative to its base URL.
pub const DEFAULT_SEND_PATH: &str = "/send-message";

/// Sends a user message and returns the reply text.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

/// `POST {base_url}{send_path}` with `{"message": ...}`.
///
/// # Example
///
/// ```rust,no_run
/// use weatherwizard_widget::transport::{HttpTransport, MessageTransport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new("http://localhost:5000", "/send-message")?;
/// let reply = transport.send("How is the weather in New York?").await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for `send_path` under `base_url`.
    pub fn new(base_url: impl AsRef<str>, send_path: &str) -> Result<Self> {
        Self::with_client(base_url, send_path, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        send_path: &str,
        http: reqwest::Client,
    ) -> Result<Self> {
        let endpoint = Url::parse(base_url.as_ref())?.join(send_path)?;
        Ok(Self { endpoint, http })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MessageTransport for HttpTransport {
    async fn send(&self, message: &str) -> Result<String> {
        let request = SendMessageRequest {
            message: message.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: SendMessageResponse = serde_json::from_str(&body)?;
        Ok(reply.message)
    }
}
