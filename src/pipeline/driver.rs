//! Pipeline driver wiring dump, chunker, pool and workers into one run

use super::pool::DispatchPool;
use super::worker::{embed_and_store, RunCounters};
use crate::chunking::ChunkSplitter;
use crate::config::PipelineConfig;
use crate::dump::DumpError;
use crate::embedding::Embedder;
use crate::store::VectorStore;
use crate::types::ArticleRecord;
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The dump stream failed (decompression or fatal parse error)
    #[error("dump stream error: {0}")]
    Stream(#[from] DumpError),
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Articles assembled from the dump
    pub articles_seen: usize,
    /// Chunks handed to the dispatch pool
    pub chunks_dispatched: usize,
    /// Chunks embedded and upserted successfully
    pub chunks_stored: usize,
    /// Chunks that failed embedding or upsert
    pub chunk_failures: usize,
    /// Wall-clock duration of the run
    pub elapsed_seconds: f64,
}

impl RunReport {
    fn from_counters(counters: &RunCounters, elapsed_seconds: f64) -> Self {
        Self {
            articles_seen: counters.articles_seen.load(Ordering::Relaxed),
            chunks_dispatched: counters.chunks_dispatched.load(Ordering::Relaxed),
            chunks_stored: counters.chunks_stored.load(Ordering::Relaxed),
            chunk_failures: counters.chunk_failures.load(Ordering::Relaxed),
            elapsed_seconds,
        }
    }

    /// Articles processed per second over the whole run
    pub fn articles_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.articles_seen as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }
}

/// Drives one dump through chunking, embedding and storage.
///
/// The article stream is consumed inline on the calling task (dump reads are
/// blocking file I/O, like the rest of the ingest path), so `run` should be
/// awaited from the multi-threaded runtime.
pub struct SeedPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    splitter: ChunkSplitter,
    config: PipelineConfig,
}

impl SeedPipeline {
    /// Create a pipeline over the given collaborators
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        splitter: ChunkSplitter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            splitter,
            config,
        }
    }

    /// Run the pipeline over an article stream until it ends, then wait for
    /// all in-flight chunks to finish.
    ///
    /// On a fatal stream error the already-admitted chunks are drained
    /// first, then the error is returned; in-flight work is never
    /// abandoned.
    pub async fn run<I>(&self, source: I) -> Result<RunReport, PipelineError>
    where
        I: IntoIterator<Item = Result<ArticleRecord, DumpError>>,
    {
        let start = Instant::now();
        let counters = Arc::new(RunCounters::default());
        let mut pool = DispatchPool::new(self.config.concurrency);

        info!(
            concurrency = pool.limit(),
            "starting seed run"
        );

        for result in source {
            if let Some(max) = self.config.max_articles {
                if counters.articles_seen.load(Ordering::Relaxed) >= max {
                    info!("reached max articles limit: {}", max);
                    break;
                }
            }

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    error!("fatal stream error: {}; draining in-flight chunks", e);
                    pool.drain().await;
                    return Err(PipelineError::Stream(e));
                }
            };

            let seen = counters.articles_seen.fetch_add(1, Ordering::Relaxed) + 1;
            let chunks = self.splitter.split(&record);

            if chunks.is_empty() {
                debug!(article_id = %record.id, "article has no embeddable text");
            }
            for chunk in chunks {
                counters.chunks_dispatched.fetch_add(1, Ordering::Relaxed);
                pool.admit(embed_and_store(
                    Arc::clone(&self.embedder),
                    Arc::clone(&self.store),
                    chunk,
                    Arc::clone(&counters),
                ))
                .await;
            }

            if seen % self.config.progress_interval == 0 {
                info!(
                    articles = seen,
                    chunks = counters.chunks_dispatched.load(Ordering::Relaxed),
                    failures = counters.chunk_failures.load(Ordering::Relaxed),
                    "seed progress"
                );
            }
        }

        pool.drain().await;

        let report = RunReport::from_counters(&counters, start.elapsed().as_secs_f64());
        info!(
            articles = report.articles_seen,
            chunks = report.chunks_dispatched,
            stored = report.chunks_stored,
            failures = report.chunk_failures,
            "seed run complete"
        );
        Ok(report)
    }
}
