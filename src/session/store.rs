//! Per-browser widget sessions and their store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::transport::MessageTransport;
use crate::view::{HtmlLog, InputField, Region, TextInput, ToggleRegion};
use crate::widget::{ChatWidget, ExampleQuestion, Submission, WidgetBindings};

/// Default session timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default cap on open sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// One open widget page.
///
/// Owns the three view targets and the widget bound to them. Cloning is cheap
/// and clones share state.
#[derive(Debug, Clone)]
pub struct WidgetSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    id: String,
    log: Arc<HtmlLog>,
    input: Arc<TextInput>,
    examples: Arc<ToggleRegion>,
    widget: ChatWidget,
    /// Held while the input field is filled and read back by a submission.
    input_lock: Mutex<()>,
    /// Text of the last submission that got no reply.
    last_failed: RwLock<Option<String>>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl WidgetSession {
    /// Create a session whose widget talks through `transport`.
    #[must_use]
    pub fn new(id: String, transport: Arc<dyn MessageTransport>) -> Self {
        let log = Arc::new(HtmlLog::new());
        let input = Arc::new(TextInput::new());
        let examples = Arc::new(ToggleRegion::new());
        let widget = ChatWidget::new(
            WidgetBindings {
                log: Arc::<HtmlLog>::clone(&log),
                input: Arc::<TextInput>::clone(&input),
                examples: Arc::<ToggleRegion>::clone(&examples),
            },
            transport,
        );
        Self {
            inner: Arc::new(SessionInner {
                id,
                log,
                input,
                examples,
                widget,
                input_lock: Mutex::new(()),
                last_failed: RwLock::new(None),
                last_activity: RwLock::new(Utc::now()),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn log(&self) -> &HtmlLog {
        &self.inner.log
    }

    /// Current value of the input field.
    #[must_use]
    pub fn input_value(&self) -> String {
        self.inner.input.value()
    }

    #[must_use]
    pub fn examples_hidden(&self) -> bool {
        self.inner.examples.is_hidden()
    }

    /// Text that can be resubmitted after a failed request.
    #[must_use]
    pub fn last_failed(&self) -> Option<String> {
        self.inner.last_failed.read().unwrap().clone()
    }

    /// Replace the input field's value without submitting.
    pub fn set_input_value(&self, text: &str) {
        self.inner.input.set_value(text);
    }

    /// Put `text` in the input field and submit it.
    ///
    /// Concurrent calls on one session are serialised so each one submits its
    /// own text.
    pub async fn submit_text(&self, text: &str) -> Result<Submission> {
        let _guard = self.inner.input_lock.lock().await;
        self.set_input_value(text);
        let pending = self.inner.input.value();
        let result = self.inner.widget.submit_from_input().await;
        self.settle(pending, result)
    }

    pub async fn submit_example(&self, question: ExampleQuestion) -> Result<Submission> {
        let result = self.inner.widget.submit_example_question(question).await;
        self.settle(question.text().to_string(), result)
    }

    /// Resubmit the last failed text. Returns `Skipped` if nothing failed.
    pub async fn retry(&self) -> Result<Submission> {
        let pending = self.inner.last_failed.write().unwrap().take();
        let Some(text) = pending else {
            return Ok(Submission::Skipped);
        };
        let result = self.inner.widget.submit_user_message(&text).await;
        self.settle(text, result)
    }

    fn settle(&self, text: String, result: Result<Submission>) -> Result<Submission> {
        {
            let mut failed = self.inner.last_failed.write().unwrap();
            match &result {
                Ok(Submission::Answered(_)) => *failed = None,
                Ok(Submission::Skipped) => {}
                Err(_) => *failed = Some(text),
            }
        }
        self.touch();
        result
    }

    fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap();
        *guard = Utc::now();
    }

    fn last_activity(&self) -> DateTime<Utc> {
        *self.inner.last_activity.read().unwrap()
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = self.last_activity();
        // Negative durations (clock skew) count as fresh.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }
}

/// Thread-safe store for widget sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    sessions: RwLock<HashMap<String, WidgetSession>>,
    transport: Arc<dyn MessageTransport>,
    max_sessions: usize,
}

impl fmt::Debug for SessionStoreInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStoreInner")
            .field("sessions", &self.sessions)
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store whose sessions share `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn MessageTransport>) -> Self {
        Self::with_capacity(transport, DEFAULT_MAX_SESSIONS)
    }

    /// Create a store holding at most `max_sessions` sessions.
    #[must_use]
    pub fn with_capacity(transport: Arc<dyn MessageTransport>, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                transport,
                max_sessions: max_sessions.max(1),
            }),
        }
    }

    /// Create a new session and return it.
    ///
    /// When the store is full the least recently active session is dropped
    /// first.
    #[must_use]
    pub fn create(&self) -> WidgetSession {
        let id = Uuid::new_v4().to_string();
        let session = WidgetSession::new(id.clone(), Arc::clone(&self.inner.transport));
        let mut guard = self.inner.sessions.write().unwrap();
        while guard.len() >= self.inner.max_sessions {
            let Some(oldest) = guard
                .iter()
                .min_by_key(|(_, s)| s.last_activity())
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            guard.remove(&oldest);
            info!(name: "session.evicted", session_id = %oldest, "Evicted idle session");
        }
        guard.insert(id, session.clone());
        session
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<WidgetSession> {
        let guard = self.inner.sessions.read().unwrap();
        guard.get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.sessions.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.sessions.write().unwrap();
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SendError;
    use crate::message::ChatMessage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Fails until `up` is set.
    #[derive(Default)]
    struct FlakyTransport {
        up: AtomicBool,
    }

    #[async_trait]
    impl MessageTransport for FlakyTransport {
        async fn send(&self, message: &str) -> Result<String> {
            if self.up.load(Ordering::SeqCst) {
                Ok(format!("re: {message}"))
            } else {
                Err(SendError::Status {
                    status: 503,
                    body: String::new(),
                })
            }
        }
    }

    #[test]
    fn test_session_store() {
        let store = SessionStore::new(Arc::new(FlakyTransport::default()));
        assert!(store.is_empty());

        let session = store.create();
        assert_eq!(store.len(), 1);

        let retrieved = store.get(session.id()).unwrap();
        assert_eq!(retrieved.id(), session.id());
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_full_store_evicts_least_recently_active() {
        let store = SessionStore::with_capacity(Arc::new(FlakyTransport::default()), 2);
        let first = store.create();
        std::thread::sleep(Duration::from_millis(5));
        let second = store.create();
        std::thread::sleep(Duration::from_millis(5));
        first.touch();
        std::thread::sleep(Duration::from_millis(5));

        let third = store.create();

        assert_eq!(store.len(), 2);
        assert!(store.get(first.id()).is_some());
        assert!(store.get(second.id()).is_none());
        assert!(store.get(third.id()).is_some());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = SessionStore::new(Arc::new(FlakyTransport::default()));
        let _ = store.create();
        let _ = store.create();

        assert_eq!(store.cleanup_expired_with_timeout(DEFAULT_SESSION_TIMEOUT), 0);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(store.cleanup_expired_with_timeout(Duration::from_millis(5)), 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submission_can_be_retried() {
        let transport = Arc::new(FlakyTransport::default());
        let session = WidgetSession::new("s1".to_string(), transport.clone());

        let err = session.submit_text("Rain in Oslo?").await.unwrap_err();
        assert!(matches!(err, SendError::Status { status: 503, .. }));
        assert_eq!(session.last_failed().as_deref(), Some("Rain in Oslo?"));
        assert_eq!(session.input_value(), "");
        assert!(session.examples_hidden());

        transport.up.store(true, Ordering::SeqCst);
        let outcome = session.retry().await.unwrap();
        assert_eq!(
            outcome,
            Submission::Answered(ChatMessage::assistant("re: Rain in Oslo?"))
        );
        assert!(session.last_failed().is_none());
        assert_eq!(
            session.log().entries(),
            vec![
                ChatMessage::user("Rain in Oslo?"),
                ChatMessage::user("Rain in Oslo?"),
                ChatMessage::assistant("re: Rain in Oslo?"),
            ]
        );
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_skipped() {
        let session = WidgetSession::new("s2".to_string(), Arc::new(FlakyTransport::default()));
        assert_eq!(session.retry().await.unwrap(), Submission::Skipped);
        assert!(session.log().is_empty());
    }

    /// Answers after yielding, recording every message it was asked to send.
    #[derive(Default)]
    struct RecordingTransport {
        sent: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageTransport for RecordingTransport {
        async fn send(&self, message: &str) -> Result<String> {
            self.sent.lock().unwrap().push(message.to_string());
            tokio::task::yield_now().await;
            Ok(format!("re: {message}"))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_posts_each_submit_their_own_text() {
        for _ in 0..200 {
            let transport = Arc::new(RecordingTransport::default());
            let session = WidgetSession::new("s4".to_string(), transport.clone());

            let a = tokio::spawn({
                let session = session.clone();
                async move { session.submit_text("Rain in Oslo?").await }
            });
            let b = tokio::spawn({
                let session = session.clone();
                async move { session.submit_text("Sun in Rome?").await }
            });
            assert!(matches!(a.await.unwrap(), Ok(Submission::Answered(_))));
            assert!(matches!(b.await.unwrap(), Ok(Submission::Answered(_))));

            let mut sent = transport.sent.lock().unwrap().clone();
            sent.sort();
            assert_eq!(sent, vec!["Rain in Oslo?", "Sun in Rome?"]);
            assert_eq!(session.log().len(), 4);
        }
    }

    #[tokio::test]
    async fn test_blank_submission_keeps_input() {
        let session = WidgetSession::new("s3".to_string(), Arc::new(FlakyTransport::default()));
        assert_eq!(session.submit_text("  ").await.unwrap(), Submission::Skipped);
        assert_eq!(session.input_value(), "  ");
        assert!(session.last_failed().is_none());
        assert!(!session.examples_hidden());
    }
}
