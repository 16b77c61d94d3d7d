//! Fake `/send-message` endpoint shared by the integration tests.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// What the fake endpoint answers with.
#[derive(Debug, Default)]
pub struct FakeEndpoint {
    /// Request bodies received, in arrival order.
    pub received: Mutex<Vec<Value>>,
    /// `Content-Type` headers received.
    pub content_types: Mutex<Vec<String>>,
    /// Answer 500 while set.
    pub failing: AtomicBool,
    /// Answer with a non-JSON body while set.
    pub garbled: AtomicBool,
    /// Fixed reply text; echoes the message when unset.
    pub reply: Mutex<Option<String>>,
}

impl FakeEndpoint {
    pub fn replying(text: &str) -> Arc<Self> {
        let endpoint = Self::default();
        *endpoint.reply.lock().unwrap() = Some(text.to_string());
        Arc::new(endpoint)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn send_message(
    State(endpoint): State<Arc<FakeEndpoint>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(ct) = headers.get(header::CONTENT_TYPE) {
        endpoint
            .content_types
            .lock()
            .unwrap()
            .push(ct.to_str().unwrap_or_default().to_string());
    }
    endpoint.received.lock().unwrap().push(body.clone());

    if endpoint.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if endpoint.garbled.load(Ordering::SeqCst) {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }

    let reply = endpoint
        .reply
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| format!("re: {}", body["message"].as_str().unwrap_or_default()));
    Json(json!({ "message": reply })).into_response()
}

/// Serve `endpoint` on an ephemeral port and return its base URL.
pub async fn spawn_endpoint(endpoint: Arc<FakeEndpoint>) -> String {
    let app = Router::new()
        .route("/send-message", post(send_message))
        .with_state(endpoint);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Tracing layer that records the level and name of every event.
#[derive(Debug, Clone, Default)]
pub struct EventCapture {
    events: Arc<Mutex<Vec<(tracing::Level, &'static str)>>>,
}

impl EventCapture {
    /// Levels of the recorded events called `name`.
    pub fn levels_of(&self, name: &str) -> Vec<tracing::Level> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, event)| *event == name)
            .map(|(level, _)| *level)
            .collect()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let meta = event.metadata();
        self.events.lock().unwrap().push((*meta.level(), meta.name()));
    }
}

/// Record events on the current thread until the guard is dropped.
pub fn capture_events() -> (EventCapture, tracing::subscriber::DefaultGuard) {
    use tracing_subscriber::layer::SubscriberExt;

    let capture = EventCapture::default();
    let guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));
    (capture, guard)
}
