//! HTTP surface for the NCD chatbot.
//!
//! The answering engine is constructed once at process startup and injected
//! into the handlers through [`AppState`]; a failed construction (typically a
//! missing index) leaves the API up but unhealthy, with `/chat` returning 503
//! until setup has been run and the server restarted.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use ncd_rag::{AppSettings, Chatbot, IndexStore, RagConfig, Retriever, VectorIndex};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    chatbot: Option<Arc<Chatbot>>,
    init_error: Option<String>,
}

impl AppState {
    /// State for a successfully constructed engine.
    pub fn ready(chatbot: Arc<Chatbot>) -> Self {
        Self { chatbot: Some(chatbot), init_error: None }
    }

    /// State recording why the engine could not be constructed.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self { chatbot: None, init_error: Some(message.into()) }
    }
}

/// Construct the answering engine from settings, once, at startup.
///
/// Construction failures are captured in the returned state rather than
/// aborting the process, so `/health` can report them.
pub async fn init_state(settings: &AppSettings, config: &RagConfig) -> AppState {
    match build_chatbot(settings, config).await {
        Ok(chatbot) => AppState::ready(Arc::new(chatbot)),
        Err(e) => {
            warn!(error = %e, "answering engine unavailable");
            AppState::unavailable(e.to_string())
        }
    }
}

async fn build_chatbot(settings: &AppSettings, config: &RagConfig) -> ncd_rag::Result<Chatbot> {
    let embedder = settings.embedder()?;
    let store = Arc::new(IndexStore::new(
        &settings.persist_dir,
        &settings.collection_name,
        embedder,
    ));
    store.load().await?;

    let retriever = Retriever::new(store as Arc<dyn VectorIndex>, config.top_k);
    let generator = settings.generator()?;
    Ok(Chatbot::new(retriever, generator))
}

/// Build the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/chat/stream", post(chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Request/response models ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub return_sources: bool,
}

#[derive(Debug, Serialize)]
pub struct SourceDocument {
    pub source: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceDocument>>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// An error mapped to an HTTP status with a JSON detail body.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.message }));
        (self.status, body).into_response()
    }
}

// ── Handlers ───────────────────────────────────────────────────────

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
        message: "NCD RAG Chatbot API is running".into(),
    })
}

async fn health(State(state): State<AppState>) -> Json<StatusResponse> {
    match (&state.chatbot, &state.init_error) {
        (Some(_), _) => Json(StatusResponse {
            status: "healthy".into(),
            message: "Chatbot is ready".into(),
        }),
        (None, error) => Json(StatusResponse {
            status: "unhealthy".into(),
            message: error.clone().unwrap_or_else(|| "Chatbot is not initialized".into()),
        }),
    }
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Question cannot be empty"));
    }

    let chatbot = state.chatbot.as_ref().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Chatbot not initialized. Please run setup first.",
        )
    })?;

    let response = chatbot
        .ask(&request.question, request.return_sources)
        .await
        .map_err(|e| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing question: {e}"),
            )
        })?;

    let sources = request.return_sources.then(|| {
        response
            .sources
            .into_iter()
            .map(|s| SourceDocument { source: s.source, content: s.content })
            .collect()
    });

    Ok(Json(ChatResponse { answer: response.answer, sources }))
}
