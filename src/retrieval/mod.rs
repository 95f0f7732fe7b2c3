//! Retrieval engine — top-1 semantic nearest neighbor over the reference corpus.
//!
//! The corpus is embedded exactly once, in a single batch call, before the
//! engine is published to the request path. After that the index is immutable
//! and shared read-only across concurrent requests. Per query: embed the
//! query, linear-scan every entry with cosine similarity, keep the maximum.
//! A linear scan is deliberate — the corpus is small and fixed, so an
//! approximate nearest-neighbor structure would buy nothing.

use std::sync::Arc;

use tracing::info;

use crate::embedding::{cosine_similarity, Embedder, EmbeddingError, EmbeddingVector};

/// One corpus entry with its precomputed embedding.
///
/// `index` is the entry's position in the corpus, stable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct ReferenceEntry {
    pub index: usize,
    pub text: String,
    pub embedding: EmbeddingVector,
}

/// Precomputed embeddings for the whole reference corpus.
///
/// Built once at startup; `len()` always equals the corpus length — the two
/// are constructed together and never diverge.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    entries: Vec<ReferenceEntry>,
}

impl SimilarityIndex {
    /// Embed the full corpus in one batch call and build the index.
    pub async fn build(
        embedder: &dyn Embedder,
        corpus: &[String],
    ) -> Result<Self, EmbeddingError> {
        if corpus.is_empty() {
            return Ok(Self::default());
        }

        let vectors = embedder.embed_batch(corpus.to_vec()).await?;
        if vectors.len() != corpus.len() {
            return Err(EmbeddingError::Inference(format!(
                "embedder returned {} vectors for {} corpus entries",
                vectors.len(),
                corpus.len()
            )));
        }

        let entries = corpus
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(index, (text, embedding))| ReferenceEntry {
                index,
                text: text.clone(),
                embedding,
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ReferenceEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }
}

/// Outcome of a top-1 scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    /// Best-scoring entry. `index` always points at a valid corpus entry.
    Match { index: usize, score: f32 },
    /// Empty corpus, or no entry produced a score above the scan floor.
    NoMatch,
}

/// Embeds queries and ranks the reference corpus against them.
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    index: SimilarityIndex,
}

impl RetrievalEngine {
    /// Build the similarity index and wrap it with the embedder handle.
    ///
    /// Must complete before any query is served; the HTTP layer rejects
    /// `/query` traffic with 503 until the engine is published.
    pub async fn initialize(
        embedder: Arc<dyn Embedder>,
        corpus: &[String],
    ) -> Result<Self, EmbeddingError> {
        let index = SimilarityIndex::build(embedder.as_ref(), corpus).await?;
        info!(
            entries = index.len(),
            dimension = embedder.dimension(),
            "Reference corpus embedded"
        );
        Ok(Self { embedder, index })
    }

    /// Embed `query` and return the corpus entry with the highest cosine
    /// similarity.
    ///
    /// The scan uses strict greater-than against a floor of -1.0, so on ties
    /// the lowest index wins (first occurrence retained), and NaN scores are
    /// skipped. An empty index yields [`MatchResult::NoMatch`].
    pub async fn find_best_match(&self, query: &str) -> Result<MatchResult, EmbeddingError> {
        if self.index.is_empty() {
            return Ok(MatchResult::NoMatch);
        }

        let query_vector = self.embedder.embed_one(query).await?;

        let mut highest = -1.0f32;
        let mut best = MatchResult::NoMatch;
        for entry in self.index.entries() {
            let score = cosine_similarity(&query_vector, &entry.embedding);
            if score > highest {
                highest = score;
                best = MatchResult::Match {
                    index: entry.index,
                    score,
                };
            }
        }

        Ok(best)
    }

    /// Text of the corpus entry at `index`.
    pub fn context_text(&self, index: usize) -> Option<&str> {
        self.index.get(index).map(|e| e.text.as_str())
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }
}
