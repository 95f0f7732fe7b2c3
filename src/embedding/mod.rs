//! Text embedding boundary
//!
//! Treats the embedding model as a black box: a function from text to a
//! fixed-length dense vector. The production implementation wraps a local
//! ONNX sentence-transformer ([`LocalEmbedder`]); tests substitute
//! deterministic stubs through the [`Embedder`] trait.

mod local;

pub use local::{LocalEmbedder, EMBEDDING_DIM};

use async_trait::async_trait;

/// A fixed-length dense vector produced by the embedding model.
pub type EmbeddingVector = Vec<f32>;

/// Embedding failures, split by when they occur.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The model could not be loaded. Fatal at startup — the process must
    /// not serve `/query` without a working embedder.
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),
    /// An embed call failed after the model loaded.
    #[error("Embedding inference failed: {0}")]
    Inference(String),
}

/// Black-box text → vector function.
///
/// Implementations must be safe to share across concurrent requests; the
/// relay holds a single instance behind an `Arc` for the process lifetime.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<EmbeddingVector>, EmbeddingError>;

    /// Embed a single text (single-item batch).
    async fn embed_one(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let mut batch = self.embed_batch(vec![text.to_string()]).await?;
        batch
            .pop()
            .ok_or_else(|| EmbeddingError::Inference("embedder returned an empty batch".to_string()))
    }

    /// Dimensionality of the vectors this embedder produces.
    fn dimension(&self) -> usize;
}

/// Cosine similarity between two vectors: `dot(a,b) / (|a| * |b|)`, in [-1, 1].
///
/// If either vector has zero magnitude the quotient is undefined; a zero
/// vector carries no direction, so this returns 0.0 instead of NaN.
/// Mismatched lengths also score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
