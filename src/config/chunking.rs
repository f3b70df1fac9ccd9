//! Chunking configuration

use serde::{Deserialize, Serialize};

fn default_max_chunk_chars() -> usize {
    1500
}

/// Configuration for the body chunker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Upper bound on chunk length in characters; paragraphs beyond this are
    /// re-split at sentence boundaries
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}
