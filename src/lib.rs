//! qa-relay: Semantic context retrieval and question-answering relay
//!
//! Accepts a natural-language query over HTTP, picks the best-matching
//! entry from a fixed reference corpus by embedding cosine similarity,
//! forwards (context, question) to a downstream QA API, and relays the
//! response verbatim.
//!
//! ## Architecture
//!
//! - **Embedding**: black-box text → vector boundary with a local ONNX
//!   implementation
//! - **Retrieval Engine**: startup batch embedding of the corpus, then a
//!   top-1 cosine scan per query
//! - **Answer Gateway**: single-shot reqwest call to the QA API
//! - **API**: axum handlers mapping the error taxonomy to HTTP outcomes

pub mod api;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod gateway;
pub mod retrieval;

// Re-export the request-path types
pub use api::{create_app, RelayState};
pub use config::RelayConfig;
pub use embedding::{cosine_similarity, Embedder, EmbeddingError, EmbeddingVector, LocalEmbedder};
pub use gateway::{AnswerGateway, GatewayError, HttpAnswerGateway};
pub use retrieval::{MatchResult, ReferenceEntry, RetrievalEngine, SimilarityIndex};
