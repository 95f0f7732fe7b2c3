//! Query Endpoint Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! `/` and `/query` using `tower::ServiceExt::oneshot()`. No binary spawn,
//! no network port, no model download — embedder and gateway are
//! deterministic test doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use qa_relay::api::{create_app, RelayState};
use qa_relay::embedding::{Embedder, EmbeddingError, EmbeddingVector};
use qa_relay::gateway::{AnswerGateway, GatewayError};
use qa_relay::retrieval::RetrievalEngine;

// ============================================================================
// Test Doubles
// ============================================================================

/// Deterministic embedder backed by a fixed text → vector table.
struct TableEmbedder {
    table: HashMap<String, EmbeddingVector>,
}

impl TableEmbedder {
    fn new(pairs: &[(&str, &[f32])]) -> Self {
        Self {
            table: pairs
                .iter()
                .map(|(t, v)| (t.to_string(), v.to_vec()))
                .collect(),
        }
    }
}

#[async_trait]
impl Embedder for TableEmbedder {
    async fn embed_batch(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        texts
            .iter()
            .map(|t| {
                self.table
                    .get(t)
                    .cloned()
                    .ok_or_else(|| EmbeddingError::Inference(format!("no test vector for {t:?}")))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        3
    }
}

/// Gateway double that records call count and arguments.
struct MockGateway {
    calls: AtomicUsize,
    last_args: Mutex<Option<(String, String)>>,
    /// None → succeed with a canned payload; Some → fail with that status.
    fail_with: Option<StatusCode>,
}

impl MockGateway {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_args: Mutex::new(None),
            fail_with: None,
        })
    }

    fn failing(status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_args: Mutex::new(None),
            fail_with: Some(status),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_args(&self) -> Option<(String, String)> {
        self.last_args.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerGateway for MockGateway {
    async fn ask(
        &self,
        context: &str,
        question: &str,
    ) -> Result<serde_json::Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock().unwrap() = Some((context.to_string(), question.to_string()));

        match self.fail_with {
            Some(status) => Err(GatewayError::UpstreamStatus(
                reqwest::StatusCode::from_u16(status.as_u16()).unwrap(),
            )),
            None => Ok(serde_json::json!({ "answer": "Paris", "score": 0.98 })),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Build a ready state: engine initialized over `corpus`, mock gateway.
async fn ready_state(
    embedder: Arc<dyn Embedder>,
    corpus: &[&str],
    gateway: Arc<MockGateway>,
) -> RelayState {
    let corpus: Vec<String> = corpus.iter().map(|s| s.to_string()).collect();
    let engine = RetrievalEngine::initialize(embedder, &corpus)
        .await
        .expect("test corpus must embed");

    let state = RelayState::new(gateway);
    state.publish_engine(engine);
    assert!(state.is_ready());
    state
}

fn query_request(user_string: &str) -> Request<Body> {
    let body = serde_json::json!({ "userString": user_string }).to_string();
    Request::builder()
        .method("POST")
        .uri("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn capital_embedder() -> Arc<dyn Embedder> {
    Arc::new(TableEmbedder::new(&[
        ("Paris is the capital of France.", &[1.0, 0.1, 0.0]),
        ("The sun is a star.", &[0.0, 0.1, 1.0]),
        ("What is the capital of France?", &[0.9, 0.2, 0.1]),
    ]))
}

// ============================================================================
// Tests
// ============================================================================

/// GET / answers immediately, even before the engine is published.
#[tokio::test]
async fn test_root_liveness_before_ready() {
    let state = RelayState::new(MockGateway::succeeding());
    let app = create_app(state);

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(json["message"], "Hello from server!");
}

/// /query before startup embedding completes gets a defined 503, not a crash,
/// and the gateway is never touched.
#[tokio::test]
async fn test_query_before_ready_returns_503() {
    let gateway = MockGateway::succeeding();
    let state = RelayState::new(gateway.clone());
    assert!(!state.is_ready());
    let app = create_app(state);

    let resp = app.oneshot(query_request("anything")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(gateway.call_count(), 0);
}

/// End-to-end success: retrieval picks the France context, the gateway
/// receives exactly (matched text, original query), and the mocked payload
/// comes back verbatim with 200.
#[tokio::test]
async fn test_query_end_to_end_success() {
    let gateway = MockGateway::succeeding();
    let state = ready_state(
        capital_embedder(),
        &["Paris is the capital of France.", "The sun is a star."],
        gateway.clone(),
    )
    .await;
    let app = create_app(state);

    let resp = app
        .oneshot(query_request("What is the capital of France?"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(json["answer"], "Paris");

    assert_eq!(gateway.call_count(), 1);
    let (context, question) = gateway.last_args().expect("gateway must be called");
    assert_eq!(context, "Paris is the capital of France.");
    assert_eq!(question, "What is the capital of France?");
}

/// Empty corpus: retrieval yields the no-match outcome, handler answers 400
/// with the fixed message, gateway never invoked.
#[tokio::test]
async fn test_query_empty_corpus_returns_400() {
    let gateway = MockGateway::succeeding();
    let state = ready_state(capital_embedder(), &[], gateway.clone()).await;
    let app = create_app(state);

    let resp = app
        .oneshot(query_request("What is the capital of France?"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_string(resp).await,
        "No suitable context found for the provided query."
    );
    assert_eq!(gateway.call_count(), 0);
}

/// Gateway failure: 500 with the fixed generic message; the upstream status
/// never leaks into the response body.
#[tokio::test]
async fn test_query_gateway_failure_returns_500() {
    let gateway = MockGateway::failing(StatusCode::BAD_GATEWAY);
    let state = ready_state(
        capital_embedder(),
        &["Paris is the capital of France.", "The sun is a star."],
        gateway.clone(),
    )
    .await;
    let app = create_app(state);

    let resp = app
        .oneshot(query_request("What is the capital of France?"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_string(resp).await,
        "Failed to get a response from the external API."
    );
    assert_eq!(gateway.call_count(), 1);
}

/// Query-time embedding failure maps to the same generic 500 and the gateway
/// is never invoked.
#[tokio::test]
async fn test_query_embedding_failure_returns_500() {
    let gateway = MockGateway::succeeding();
    // The corpus embeds fine; the query string has no test vector, so the
    // per-query embed call fails.
    let state = ready_state(
        capital_embedder(),
        &["Paris is the capital of France."],
        gateway.clone(),
    )
    .await;
    let app = create_app(state);

    let resp = app
        .oneshot(query_request("unembeddable query"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_string(resp).await,
        "Failed to get a response from the external API."
    );
    assert_eq!(gateway.call_count(), 0);
}

/// Malformed request bodies are rejected by the JSON extractor without
/// reaching retrieval or the gateway.
#[tokio::test]
async fn test_query_malformed_body_rejected() {
    let gateway = MockGateway::succeeding();
    let state = ready_state(
        capital_embedder(),
        &["Paris is the capital of France."],
        gateway.clone(),
    )
    .await;
    let app = create_app(state);

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"wrongField\": 1}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
    assert_eq!(gateway.call_count(), 0);
}
