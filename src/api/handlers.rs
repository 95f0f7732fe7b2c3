//! Request handlers and shared state.
//!
//! `POST /query` walks a small per-request state machine:
//! `Received → Retrieving → (Matched | NoMatch) → Querying → (Answered | GatewayFailed)`.
//! Every component failure terminates here — nothing propagates past the
//! handler, and gateway error details are logged, never sent to the caller.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, error};

use crate::gateway::AnswerGateway;
use crate::retrieval::{MatchResult, RetrievalEngine};

/// Fixed client-facing message for retrieval and gateway failures.
const GENERIC_FAILURE: &str = "Failed to get a response from the external API.";

/// Client-facing message when retrieval finds nothing.
const NO_MATCH: &str = "No suitable context found for the provided query.";

/// Client-facing message while startup embedding is still running.
const NOT_READY: &str = "Service is starting up; retrieval index is not ready yet.";

// ============================================================================
// Shared State
// ============================================================================

/// Shared state for the relay.
///
/// The retrieval engine starts empty and is published atomically once the
/// startup embedding completes; until then `/query` is rejected with 503.
/// After publication the engine is immutable — concurrent requests read it
/// without locks.
#[derive(Clone)]
pub struct RelayState {
    engine: Arc<ArcSwapOption<RetrievalEngine>>,
    gateway: Arc<dyn AnswerGateway>,
}

impl RelayState {
    pub fn new(gateway: Arc<dyn AnswerGateway>) -> Self {
        Self {
            engine: Arc::new(ArcSwapOption::empty()),
            gateway,
        }
    }

    /// Publish the initialized retrieval engine to the request path.
    pub fn publish_engine(&self, engine: RetrievalEngine) {
        self.engine.store(Some(Arc::new(engine)));
    }

    /// Whether the retrieval engine has been published.
    pub fn is_ready(&self) -> bool {
        self.engine.load().is_some()
    }
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// The user's natural-language question.
    #[serde(rename = "userString")]
    pub user_string: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / — liveness check.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello from server!" }))
}

/// POST /query — retrieve the best-matching context and relay the question.
pub async fn post_query(
    State(state): State<RelayState>,
    Json(req): Json<QueryRequest>,
) -> Response {
    // Startup embedding may still be in flight.
    let engine = match state.engine.load_full() {
        Some(engine) => engine,
        None => return (StatusCode::SERVICE_UNAVAILABLE, NOT_READY).into_response(),
    };

    // Retrieving → Matched | NoMatch
    let matched_index = match engine.find_best_match(&req.user_string).await {
        Ok(MatchResult::Match { index, score }) => {
            debug!(index, score, "Query matched corpus entry");
            index
        }
        Ok(MatchResult::NoMatch) => {
            return (StatusCode::BAD_REQUEST, NO_MATCH).into_response();
        }
        Err(e) => {
            error!("Failed to embed query: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response();
        }
    };

    // MatchResult invariant: a non-sentinel index is always valid.
    let context = match engine.context_text(matched_index) {
        Some(text) => text.to_string(),
        None => {
            error!(index = matched_index, "Matched index missing from corpus");
            return (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response();
        }
    };

    // Querying → Answered | GatewayFailed
    match state.gateway.ask(&context, &req.user_string).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(e) => {
            error!("Error while querying the external API: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response()
        }
    }
}
