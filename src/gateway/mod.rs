//! Answer Gateway — HTTP client for the downstream question-answering API.
//!
//! Adapts a (context, question) pair into one POST against `API_URL` and
//! hands the response body back verbatim. The relay never interprets the
//! payload shape, and never retries — a failed call surfaces immediately.

use async_trait::async_trait;
use reqwest::header;

/// Gateway failures. Details are logged server-side only; the HTTP layer
/// maps both variants to a generic 500.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("QA API returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
}

/// Remote (context, question) → answer call, mockable for tests.
#[async_trait]
pub trait AnswerGateway: Send + Sync {
    /// Forward the matched context and the user's question; return the raw
    /// JSON payload on success.
    async fn ask(&self, context: &str, question: &str)
        -> Result<serde_json::Value, GatewayError>;
}

/// reqwest-backed gateway used in production.
#[derive(Clone)]
pub struct HttpAnswerGateway {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpAnswerGateway {
    /// Create a gateway client with a bounded request timeout.
    pub fn new(api_url: &str, api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl AnswerGateway for HttpAnswerGateway {
    async fn ask(
        &self,
        context: &str,
        question: &str,
    ) -> Result<serde_json::Value, GatewayError> {
        let payload = serde_json::json!({
            "inputs": {
                "question": question,
                "context": context,
            }
        });

        let resp = self
            .http
            .post(&self.api_url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, &self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GatewayError::UpstreamStatus(resp.status()));
        }

        Ok(resp.json().await?)
    }
}
