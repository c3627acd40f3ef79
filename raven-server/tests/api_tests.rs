//! HTTP surface tests against an in-process router with scripted components.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use raven_chat::{AppConfig, ChatSession};
use raven_model::MockLlm;
use raven_rag::{HashEmbeddingProvider, RagConfig};
use raven_server::{router, AppState};
use tower::ServiceExt;

fn test_state(reply: &str, with_documents: bool) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("scripts");
    std::fs::create_dir_all(&docs).unwrap();
    if with_documents {
        std::fs::write(docs.join("pilot.txt"), "The attic is the only honest room.").unwrap();
    }

    let mut config = AppConfig::default();
    config.rag = RagConfig::builder()
        .docs_dir(&docs)
        .persist_dir(dir.path().join("index"))
        .collection("scripts")
        .chunk_size(80)
        .chunk_overlap(10)
        .top_k(1)
        .build()
        .unwrap();

    let session = ChatSession::builder(config)
        .embedding_provider(Arc::new(HashEmbeddingProvider::new(16)))
        .llm(Arc::new(MockLlm::new(reply)))
        .build();

    (AppState::new(Arc::new(session), None), dir)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_state_before_and_after_init() {
    let (state, _dir) = test_state("reply", true);
    let app = router(state.clone());

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["state"], "uninitialized");

    let chat = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"message": "hello"}"#))
        .unwrap();
    let response = app.clone().oneshot(chat).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["state"], "ready");
    assert_eq!(json["model"], "mock");
}

#[tokio::test]
async fn chat_returns_reply_and_model() {
    let (state, _dir) = test_state("I live in the walls.", true);
    let app = router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"message": "where do you live?"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "I live in the walls.");
    assert_eq!(json["model"], "mock");
    assert!(json["audio_path"].is_null());
}

#[tokio::test]
async fn chat_with_no_documents_is_service_unavailable() {
    let (state, _dir) = test_state("unused", false);
    let app = router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"message": "hello"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn stream_endpoint_emits_sse_fragments() {
    let (state, _dir) = test_state("short reply", true);
    let app = router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat/stream")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"message": "hello"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    let streamed: String = body
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .collect::<Vec<_>>()
        .join("");
    assert_eq!(streamed, "short reply");
}
