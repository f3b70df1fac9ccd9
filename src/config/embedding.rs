//! Embedding service configuration

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "https://api.openai.com/v1/embeddings".to_string()
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_dimensions() -> usize {
    1536
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

/// Configuration for the OpenAI-compatible embedding endpoint
///
/// Works with: OpenAI API, Azure OpenAI, LM Studio, vLLM,
/// Ollama (OpenAI compat mode), text-embeddings-inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// API endpoint URL (e.g., "https://api.openai.com/v1/embeddings")
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key (optional, can also use OPENAI_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name (e.g., "text-embedding-3-small")
    #[serde(default = "default_model")]
    pub model: String,
    /// Embedding dimensions
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Retry attempts for transient failures before a chunk counts as failed
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            dimensions: default_dimensions(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}
