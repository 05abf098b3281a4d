//! API tests over the router with an offline engine.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use ncd_rag::{
    Chatbot, Chunk, Generator, HashEmbedder, IndexStore, Result as RagResult, Retriever,
    VectorIndex,
};
use ncd_server::{router, AppState};
use tower::ServiceExt;

struct CannedGenerator;

#[async_trait]
impl Generator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> RagResult<String> {
        Ok("Diabetes is a chronic metabolic disease.".to_string())
    }
}

/// Build a ready state over a real store in a temp directory.
async fn ready_state(dir: &std::path::Path) -> AppState {
    let store = Arc::new(IndexStore::new(dir, "ncd_diseases", Arc::new(HashEmbedder::default())));
    let long_text = format!("Diabetes is a metabolic disease. {}", "More detail. ".repeat(40));
    store
        .create(&[Chunk { text: long_text, origin: "d1.txt".into(), chunk_index: 0 }])
        .await
        .unwrap();

    let chatbot = Chatbot::new(
        Retriever::new(store as Arc<dyn VectorIndex>, 4),
        Arc::new(CannedGenerator),
    );
    AppState::ready(Arc::new(chatbot))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(ready_state(dir.path()).await);

    let response =
        app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn health_is_healthy_when_engine_is_ready() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(ready_state(dir.path()).await);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn health_is_unhealthy_when_engine_failed_to_construct() {
    let app = router(AppState::unavailable("index collection 'ncd_diseases' not found"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
    assert!(json["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn blank_question_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(ready_state(dir.path()).await);

    let response = app
        .oneshot(post_json("/chat", serde_json::json!({ "question": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_without_engine_is_service_unavailable() {
    let app = router(AppState::unavailable("no index"));

    let response = app
        .oneshot(post_json("/chat", serde_json::json!({ "question": "What is diabetes?" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn chat_answers_with_sources_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(ready_state(dir.path()).await);

    let response = app
        .oneshot(post_json(
            "/chat",
            serde_json::json!({ "question": "What is diabetes?", "return_sources": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["answer"], "Diabetes is a chronic metabolic disease.");

    let sources = json["sources"].as_array().unwrap();
    assert!(!sources.is_empty());
    assert_eq!(sources[0]["source"], "d1.txt");
    assert_eq!(sources[0]["content"].as_str().unwrap().chars().count(), 300);
}

#[tokio::test]
async fn chat_omits_sources_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(ready_state(dir.path()).await);

    let response = app
        .oneshot(post_json("/chat", serde_json::json!({ "question": "What is diabetes?" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json.get("sources").is_none());
}

#[tokio::test]
async fn chat_stream_matches_chat() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(ready_state(dir.path()).await);

    let response = app
        .oneshot(post_json(
            "/chat/stream",
            serde_json::json!({ "question": "What is diabetes?" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["answer"], "Diabetes is a chronic metabolic disease.");
}
