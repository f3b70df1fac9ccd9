//! Pipeline configuration

use serde::{Deserialize, Serialize};

fn default_concurrency() -> usize {
    10
}

fn default_progress_interval() -> usize {
    1000
}

/// Configuration for the seed pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of chunks embedded and upserted concurrently.
    ///
    /// This is the self-imposed rate limit against the embedding service:
    /// once this many chunks are in flight, the dump reader stalls until a
    /// slot frees up.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Maximum articles to process (None = whole dump)
    #[serde(default)]
    pub max_articles: Option<usize>,
    /// Log a progress line every this many articles
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_articles: None,
            progress_interval: default_progress_interval(),
        }
    }
}
