//! fastembed-backed embedder (all-MiniLM-L6-v2 via ONNX).
//!
//! Model load downloads weights on first run and is slow; callers run
//! [`LocalEmbedder::load`] on the blocking pool during startup. Inference is
//! CPU-bound, so `embed_batch` hops to `spawn_blocking` as well.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use super::{Embedder, EmbeddingError, EmbeddingVector};

/// Output dimension of all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Local ONNX sentence-embedding model, loaded once per process.
pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedder {
    /// Load the embedding model. Blocking — call via `spawn_blocking`.
    pub fn load() -> Result<Self, EmbeddingError> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        let model = Arc::clone(&self.model);

        tokio::task::spawn_blocking(move || {
            let guard = model
                .lock()
                .map_err(|_| EmbeddingError::Inference("embedding model lock poisoned".to_string()))?;
            guard
                .embed(texts, None)
                .map_err(|e| EmbeddingError::Inference(e.to_string()))
        })
        .await
        .map_err(|e| EmbeddingError::Inference(format!("embedding task failed: {e}")))?
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}
