//! REST API module using Axum
//!
//! Two endpoints:
//! - `GET /` — liveness probe, available from the instant the listener binds
//! - `POST /query` — semantic retrieval + QA relay; answers 503 until the
//!   startup corpus embedding completes

pub mod handlers;

pub use handlers::RelayState;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the CORS layer.
///
/// Default allows any origin — the frontend that issues `/query` calls is
/// served from a separate host. Set `QA_RELAY_CORS_ORIGINS` to a
/// comma-separated list to restrict.
fn build_cors_layer() -> CorsLayer {
    match std::env::var("QA_RELAY_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    }
}

/// Create the complete application router.
pub fn create_app(state: RelayState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/query", post(handlers::post_query))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
