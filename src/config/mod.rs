//! Configuration for wikiseed

mod chunking;
mod embedding;
mod logging;
mod pipeline;
mod store;

pub use chunking::ChunkingConfig;
pub use embedding::EmbeddingConfig;
pub use logging::{LogLevel, LoggingConfig};
pub use pipeline::PipelineConfig;
pub use store::StoreConfig;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration, loaded from `wikiseed.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Embedding service configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Vector store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // Embedding validation
        if self.embedding.endpoint.is_empty() {
            errors.push("embedding endpoint must not be empty".to_string());
        } else if !self.embedding.endpoint.starts_with("http://")
            && !self.embedding.endpoint.starts_with("https://")
        {
            errors.push("embedding endpoint must be an http(s) URL".to_string());
        }
        if self.embedding.model.is_empty() {
            errors.push("embedding model must not be empty".to_string());
        }
        if self.embedding.dimensions == 0 {
            errors.push("embedding dimensions must be positive".to_string());
        }
        if self.embedding.dimensions > 4096 {
            errors.push("embedding dimensions must be <= 4096".to_string());
        }

        // Store validation
        if !self.store.url.starts_with("http://") && !self.store.url.starts_with("https://") {
            errors.push("store url must be an http(s) URL".to_string());
        }
        if self.store.collection.is_empty() {
            errors.push("store collection must not be empty".to_string());
        }

        // Chunking validation
        if self.chunking.max_chunk_chars == 0 {
            errors.push("max_chunk_chars must be positive".to_string());
        }

        // Pipeline validation
        if self.pipeline.concurrency == 0 {
            errors.push("concurrency must be positive".to_string());
        }
        if self.pipeline.concurrency > 1024 {
            errors.push("concurrency must be <= 1024".to_string());
        }
        if self.pipeline.progress_interval == 0 {
            errors.push("progress_interval must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}
