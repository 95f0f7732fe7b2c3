//! qa-relay — semantic retrieval and QA relay server
//!
//! # Usage
//!
//! ```bash
//! # Serve on 0.0.0.0:$PORT (default 8080)
//! API_URL=https://qa.example.com/model API_KEY=secret cargo run --release
//!
//! # Override the listen address
//! cargo run --release -- --addr 127.0.0.1:3000
//! ```
//!
//! # Environment Variables
//!
//! - `PORT`: Listen port (default: 8080)
//! - `API_URL`: Question-answering API endpoint (required)
//! - `API_KEY`: Credential forwarded as the `Authorization` header (required)
//! - `QA_RELAY_CORS_ORIGINS`: Restrict CORS to these origins (default: any)
//! - `RUST_LOG`: Logging level (default: info)

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use qa_relay::api::{create_app, RelayState};
use qa_relay::config::RelayConfig;
use qa_relay::corpus;
use qa_relay::embedding::{Embedder, LocalEmbedder};
use qa_relay::gateway::HttpAnswerGateway;
use qa_relay::retrieval::RetrievalEngine;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "qa-relay")]
#[command(about = "Semantic context retrieval and question-answering relay")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:{PORT}")
    #[arg(short, long)]
    addr: Option<String>,
}

// ============================================================================
// Startup Embedding
// ============================================================================

/// Phase two of startup: load the embedding model, batch-embed the corpus,
/// and publish the engine to the request path.
///
/// `/` serves liveness checks while this runs; `/query` answers 503. A
/// failure here is fatal — the relay must never serve `/query` with a
/// half-built index.
async fn initialize_retrieval(state: RelayState) {
    let embedder: Arc<dyn Embedder> = match tokio::task::spawn_blocking(LocalEmbedder::load).await
    {
        Ok(Ok(embedder)) => Arc::new(embedder),
        Ok(Err(e)) => {
            error!("Embedding model failed to load: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Embedding model load task panicked: {}", e);
            std::process::exit(1);
        }
    };

    match RetrievalEngine::initialize(embedder, &corpus::default_corpus()).await {
        Ok(engine) => {
            state.publish_engine(engine);
            info!("Model loaded and context embeddings precomputed");
        }
        Err(e) => {
            error!("Failed to embed reference corpus: {}", e);
            std::process::exit(1);
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = RelayConfig::from_env()?;
    let addr = args
        .addr
        .unwrap_or_else(|| format!("0.0.0.0:{}", config.port));

    let gateway = Arc::new(HttpAnswerGateway::new(&config.api_url, &config.api_key));
    let state = RelayState::new(gateway);

    // Corpus embedding runs in the background so the liveness endpoint is
    // reachable immediately.
    tokio::spawn(initialize_retrieval(state.clone()));

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
