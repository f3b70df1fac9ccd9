//! Embedding collaborator interface and HTTP client
//!
//! The pipeline only knows the [`Embedder`] trait; the production
//! implementation talks to any OpenAI-compatible embeddings endpoint:
//! OpenAI, Azure OpenAI, vLLM, Ollama, LM Studio, text-embeddings-inference.
//!
//! # Example configuration
//!
//! ```toml
//! [embedding]
//! endpoint = "https://api.openai.com/v1/embeddings"
//! model = "text-embedding-3-small"
//! dimensions = 1536
//! ```

mod http;

pub use http::HttpEmbedder;

use crate::types::Embedding;
use async_trait::async_trait;

/// Errors that can occur during embedding operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Embedding generation failed (API error or malformed response)
    #[error("embedding failed: {0}")]
    Failed(String),

    /// Non-success HTTP status from the endpoint
    #[error("HTTP error ({status}): {message}")]
    Http {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Rate limited by the API
    #[error("rate limited, retry after {retry_after_ms:?}ms")]
    RateLimited {
        /// Suggested retry delay in milliseconds, if provided by the API
        retry_after_ms: Option<u64>,
    },

    /// Network or HTTP transport error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// The external embedding service, seen from the pipeline.
///
/// Object-safe so workers can share a `dyn Embedder` and tests can swap in
/// a scripted fake.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text into a fixed-dimension vector
    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding>;

    /// The dimension of vectors this embedder produces
    fn dimensions(&self) -> usize;
}
