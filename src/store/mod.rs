//! Vector store collaborator interface and Qdrant client
//!
//! The pipeline only knows the [`VectorStore`] trait; the production
//! implementation talks to a Qdrant instance over its REST API. Upserts are
//! idempotent by point id, which is what makes re-running a seed safe.

mod qdrant;

pub use qdrant::QdrantStore;

use crate::types::EmbeddedPoint;
use async_trait::async_trait;

/// Errors that can occur while talking to the vector store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the request
    #[error("store rejected request ({status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Network or HTTP transport error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// The external vector store, seen from the pipeline.
///
/// Object-safe so workers can share a `dyn VectorStore` and tests can swap
/// in a recording fake.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert-or-overwrite one point, keyed by its id
    async fn upsert(&self, point: EmbeddedPoint) -> StoreResult<()>;
}
