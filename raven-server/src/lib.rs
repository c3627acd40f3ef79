//! # raven-server
//!
//! HTTP front end for Raven: a thin axum wrapper over the
//! [`ChatSession`] `ask`/`ask_stream` contract.
//!
//! ## Endpoints
//!
//! | method | path               | description                              |
//! |--------|--------------------|------------------------------------------|
//! | GET    | `/`                | service banner                           |
//! | GET    | `/health`          | session state, model, index size         |
//! | POST   | `/api/chat`        | blocking answer, optional audio path     |
//! | POST   | `/api/chat/stream` | SSE fragment stream, speech after drain  |

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use raven_chat::{ChatError, ChatSession, ServerConfig};
use raven_tts::{spawn_synthesize, TtsClient};

/// Shared handler state: the one session plus the optional synthesis client.
#[derive(Clone)]
pub struct AppState {
    session: Arc<ChatSession>,
    tts: Option<Arc<TtsClient>>,
}

impl AppState {
    /// Bundle the session and optional TTS client for the router.
    pub fn new(session: Arc<ChatSession>, tts: Option<Arc<TtsClient>>) -> Self {
        Self { session, tts }
    }
}

/// Body of `POST /api/chat` and `POST /api/chat/stream`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Whether to synthesize speech for the reply. Defaults to the server's
    /// TTS availability.
    #[serde(default)]
    pub use_tts: Option<bool>,
}

/// Body of the `POST /api/chat` response.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The reply text.
    pub message: String,
    /// Path of the synthesized WAV, when speech was requested and succeeded.
    pub audio_path: Option<String>,
    /// Wall-clock seconds spent producing the reply.
    pub response_time: f64,
    /// Identifier of the model that produced the reply.
    pub model: String,
    /// Unix timestamp of the response.
    pub timestamp: i64,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/chat/stream", post(chat_stream))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr, "http server listening");
    axum::serve(listener, router(state)).await
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Raven chat service",
        "status": "running",
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let model = state.session.model_name().await;
    let index_entries = state.session.index_len().await;
    Json(json!({
        "status": "ok",
        "state": state.session.state_name(),
        "model": model,
        "index_entries": index_entries,
        "tts": state.tts.is_some(),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let started = Instant::now();

    let message = state.session.ask(&request.message).await.map_err(into_http_error)?;

    let want_tts = request.use_tts.unwrap_or(state.tts.is_some());
    let audio_path = match (&state.tts, want_tts) {
        (Some(tts), true) => match tts.synthesize(&message).await {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!(error = %e, "speech synthesis failed, returning text only");
                None
            }
        },
        _ => None,
    };

    let model = state.session.model_name().await.unwrap_or_default();
    Ok(Json(ChatResponse {
        message,
        audio_path,
        response_time: started.elapsed().as_secs_f64(),
        model,
        timestamp: chrono::Utc::now().timestamp(),
    }))
}

async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    let (stream, transcript) = state
        .session
        .ask_stream_with_transcript(&request.message)
        .await
        .map_err(into_http_error)?;

    // Speech runs after the stream has fully drained, outside its control
    // flow; an abandoned stream drops the channel and no audio is produced.
    if let Some(tts) = state.tts.clone().filter(|_| request.use_tts.unwrap_or(true)) {
        tokio::spawn(async move {
            if let Ok(text) = transcript.await {
                spawn_synthesize(tts, text);
            }
        });
    }

    let events = stream.map(|fragment| Ok(Event::default().data(fragment)));
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn into_http_error(e: ChatError) -> (StatusCode, String) {
    error!(error = %e, "request failed");
    let status = match &e {
        ChatError::Rag(raven_rag::RagError::NoDocuments { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
