//! Per-chunk embed-and-store worker

use crate::embedding::{Embedder, EmbeddingError};
use crate::store::{StoreError, VectorStore};
use crate::types::{Chunk, EmbeddedPoint};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// What went wrong with a single chunk
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Shared counters for one pipeline run
///
/// Incremented by the producer (articles, dispatches) and the workers
/// (stored, failures); read once at the end of the run.
#[derive(Debug, Default)]
pub struct RunCounters {
    pub articles_seen: AtomicUsize,
    pub chunks_dispatched: AtomicUsize,
    pub chunks_stored: AtomicUsize,
    pub chunk_failures: AtomicUsize,
}

/// Embed one chunk and upsert the resulting point.
///
/// This is the error-isolation boundary: any failure is logged and counted
/// here and never escapes to sibling chunks or the producer.
pub async fn embed_and_store(
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    chunk: Chunk,
    counters: Arc<RunCounters>,
) {
    match process_chunk(embedder.as_ref(), store.as_ref(), &chunk).await {
        Ok(()) => {
            counters.chunks_stored.fetch_add(1, Ordering::Relaxed);
            debug!(
                article_id = %chunk.article_id,
                chunk_index = chunk.index,
                "chunk stored"
            );
        }
        Err(e) => {
            counters.chunk_failures.fetch_add(1, Ordering::Relaxed);
            warn!(
                article_id = %chunk.article_id,
                chunk_index = chunk.index,
                error = %e,
                "chunk failed"
            );
        }
    }
}

async fn process_chunk(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    chunk: &Chunk,
) -> Result<(), ChunkError> {
    let vector = embedder.embed(&chunk.text).await?;
    let point = EmbeddedPoint::from_chunk(chunk, vector);
    store.upsert(point).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingResult;
    use crate::store::StoreResult;
    use crate::types::Embedding;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> EmbeddingResult<Embedding> {
            Ok(vec![0.5, 0.5])
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> EmbeddingResult<Embedding> {
            Err(EmbeddingError::Failed("no embedding for you".to_string()))
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        points: Mutex<Vec<EmbeddedPoint>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn upsert(&self, point: EmbeddedPoint) -> StoreResult<()> {
            self.points.lock().unwrap().push(point);
            Ok(())
        }
    }

    fn chunk() -> Chunk {
        Chunk {
            article_id: "1".to_string(),
            title: "Alpha".to_string(),
            index: 0,
            text: "Para one.".to_string(),
        }
    }

    #[tokio::test]
    async fn stores_the_embedded_point() {
        let store = Arc::new(RecordingStore::default());
        let counters = Arc::new(RunCounters::default());

        embed_and_store(
            Arc::new(FixedEmbedder),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            chunk(),
            Arc::clone(&counters),
        )
        .await;

        let points = store.points.lock().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].payload.title, "Alpha");
        assert_eq!(points[0].vector, vec![0.5, 0.5]);
        assert_eq!(counters.chunks_stored.load(Ordering::Relaxed), 1);
        assert_eq!(counters.chunk_failures.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn embedding_failure_is_counted_not_propagated() {
        let store = Arc::new(RecordingStore::default());
        let counters = Arc::new(RunCounters::default());

        embed_and_store(
            Arc::new(FailingEmbedder),
            Arc::clone(&store) as Arc<dyn VectorStore>,
            chunk(),
            Arc::clone(&counters),
        )
        .await;

        assert!(store.points.lock().unwrap().is_empty());
        assert_eq!(counters.chunks_stored.load(Ordering::Relaxed), 0);
        assert_eq!(counters.chunk_failures.load(Ordering::Relaxed), 1);
    }
}
