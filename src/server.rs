use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;

use tracing::{debug, info, warn};

use crate::AppState;
use crate::config::AppConfig;
use crate::error::Result as SendResult;
use crate::session::{SessionStore, WidgetSession};
use crate::transport::HttpTransport;
use crate::ui::render_page;
use crate::widget::{ExampleQuestion, Submission};

/// How often idle sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.endpoint.base_url, &config.endpoint.send_path)?;
    info!(
        name: "endpoint.config.loaded",
        endpoint = %transport.endpoint(),
        "Chat endpoint configured"
    );

    let sessions = SessionStore::with_capacity(Arc::new(transport), config.server.max_sessions);
    spawn_session_sweeper(
        sessions.clone(),
        Duration::from_secs(config.server.session_timeout_secs),
    );

    let state = AppState::new(Arc::clone(&config), sessions);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %format!("http://{addr}"),
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the widget host router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/sessions/{id}", get(show_session))
        .route("/sessions/{id}/messages", post(post_message))
        .route("/sessions/{id}/examples/{n}", post(post_example))
        .route("/sessions/{id}/retry", post(post_retry))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn spawn_session_sweeper(sessions: SessionStore, timeout: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired_with_timeout(timeout);
            if removed > 0 {
                info!(
                    name: "session.expired",
                    removed,
                    remaining = sessions.len(),
                    "Expired idle sessions"
                );
            }
        }
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MessageForm {
    #[serde(default)]
    message: String,
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Open a fresh widget session.
async fn index_handler(State(state): State<AppState>) -> Redirect {
    let session = state.sessions.create();
    info!(name: "session.created", session_id = %session.id(), "Session created");
    Redirect::to(&format!("/sessions/{}", session.id()))
}

async fn show_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let session = find_session(&state, &id)?;
    Ok(render(&state, &session))
}

async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<MessageForm>,
) -> Result<Html<String>, StatusCode> {
    let session = find_session(&state, &id)?;
    let result = session.submit_text(&form.message).await;
    Ok(settled(&state, &session, &result))
}

async fn post_example(
    State(state): State<AppState>,
    Path((id, n)): Path<(String, u8)>,
) -> Result<Html<String>, StatusCode> {
    let session = find_session(&state, &id)?;
    let question = ExampleQuestion::from_number(n).ok_or(StatusCode::NOT_FOUND)?;
    let result = session.submit_example(question).await;
    Ok(settled(&state, &session, &result))
}

async fn post_retry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let session = find_session(&state, &id)?;
    let result = session.retry().await;
    Ok(settled(&state, &session, &result))
}

fn find_session(state: &AppState, id: &str) -> Result<WidgetSession, StatusCode> {
    state.sessions.get(id).ok_or_else(|| {
        warn!(name: "session.not_found", session_id = %id, "Unknown session");
        StatusCode::NOT_FOUND
    })
}

/// Render the page after a submission. Failures were already logged by the
/// widget and show up as the retry notice.
fn settled(
    state: &AppState,
    session: &WidgetSession,
    result: &SendResult<Submission>,
) -> Html<String> {
    match result {
        Ok(Submission::Answered(_)) => {
            debug!(name: "session.reply.rendered", session_id = %session.id(), "Reply rendered");
        }
        Ok(Submission::Skipped) => {
            debug!(name: "session.submit.skipped", session_id = %session.id(), "Nothing to send");
        }
        Err(_) => {
            debug!(name: "session.reply.missing", session_id = %session.id(), "Rendering retry notice");
        }
    }
    render(state, session)
}

fn render(state: &AppState, session: &WidgetSession) -> Html<String> {
    Html(render_page(
        &state.config.widget.title,
        &state.labels,
        session,
    ))
}

