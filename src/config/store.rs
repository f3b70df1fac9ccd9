//! Vector store configuration

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "wikipedia".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

/// Configuration for the Qdrant REST endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the Qdrant instance
    #[serde(default = "default_url")]
    pub url: String,
    /// Value for the `api-key` header (optional, local instances need none)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Target collection name
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Retry attempts for transient failures before a chunk counts as failed
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            collection: default_collection(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}
