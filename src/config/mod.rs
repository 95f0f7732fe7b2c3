//! Relay Configuration
//!
//! Environment-variable configuration, loaded once at startup. A local
//! `.env` file is picked up via `dotenvy` before parsing.
//!
//! ## Recognized Variables
//!
//! - `PORT` — listen port (default 8080)
//! - `API_URL` — question-answering API endpoint (required)
//! - `API_KEY` — credential forwarded verbatim as the `Authorization`
//!   header on gateway calls (required)
//! - `QA_RELAY_CORS_ORIGINS` — comma-separated allowed origins; unset
//!   allows any origin (the dashboard is served from a separate host)
//! - `RUST_LOG` — tracing filter (default `info`)

use anyhow::{Context, Result};

/// Default listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Process configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Listen port for the HTTP server.
    pub port: u16,
    /// Endpoint of the downstream question-answering API.
    pub api_url: String,
    /// Credential sent as the `Authorization` header to the QA API.
    pub api_key: String,
}

impl RelayConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Missing `API_URL` or `API_KEY` is a fatal startup error — the relay
    /// cannot answer queries without its downstream API.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            Err(_) => DEFAULT_PORT,
        };

        let api_url = std::env::var("API_URL")
            .context("API_URL must be set to the question-answering API endpoint")?;
        let api_key = std::env::var("API_KEY")
            .context("API_KEY must be set (forwarded as the Authorization header)")?;

        Ok(Self {
            port,
            api_url,
            api_key,
        })
    }
}
