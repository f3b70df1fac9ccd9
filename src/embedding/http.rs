//! HTTP embedding client for OpenAI-compatible APIs

use super::{Embedder, EmbeddingError, EmbeddingResult};
use crate::config::EmbeddingConfig;
use crate::types::Embedding;
use crate::util::{is_transient, retry_backoff, should_retry};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Embedding client for OpenAI-compatible endpoints with bounded retry
pub struct HttpEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

/// OpenAI embedding request format
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    encoding_format: &'a str,
}

/// OpenAI embedding response format
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

/// OpenAI error response format
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl HttpEmbedder {
    /// Create a new embedding client
    pub fn new(config: EmbeddingConfig) -> EmbeddingResult<Self> {
        info!(
            "initializing embedding client: endpoint={}, model={}",
            config.endpoint, config.model
        );

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // API key from config or environment
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        if let Some(key) = &api_key {
            let auth_value = format!("Bearer {}", key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth_value)
                    .map_err(|e| EmbeddingError::Config(format!("invalid API key: {}", e)))?,
            );
        } else if config.endpoint.contains("openai.com") || config.endpoint.contains("azure.com") {
            warn!("no API key provided for {}", config.endpoint);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| EmbeddingError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// One embedding request, no retries
    async fn request_embedding(&self, text: &str) -> EmbeddingResult<Embedding> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: [text],
            // Only models that support shortening accept the dimensions field
            dimensions: if self.config.model.contains("text-embedding-3") {
                Some(self.config.dimensions)
            } else {
                None
            },
            encoding_format: "float",
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|s| s * 1000);

            return Err(EmbeddingError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());

            // Surface the API's own message when it sends one
            let message = match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(error_response) => error_response.error.message,
                Err(_) => error_text,
            };

            return Err(EmbeddingError::Http { status, message });
        }

        let payload: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Failed(format!("failed to parse response: {}", e)))?;

        let mut data = payload.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .next()
            .map(|d| normalize_embedding(d.embedding))
            .ok_or_else(|| EmbeddingError::Failed("no embedding returned".to_string()))
    }

    /// Whether the failed attempt should be retried, and after what delay
    fn retry_delay(&self, err: &EmbeddingError, attempt: usize) -> Option<Duration> {
        if attempt >= self.config.max_retries {
            return None;
        }
        match err {
            EmbeddingError::RateLimited { retry_after_ms } => Some(
                retry_after_ms
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| retry_backoff(attempt)),
            ),
            EmbeddingError::Network(e) if is_transient(e) => Some(retry_backoff(attempt)),
            EmbeddingError::Http { status, .. } if should_retry(*status) => {
                Some(retry_backoff(attempt))
            }
            _ => None,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Embedding> {
        let mut attempt = 0usize;
        loop {
            match self.request_embedding(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(err) => {
                    attempt += 1;
                    match self.retry_delay(&err, attempt) {
                        Some(delay) => {
                            debug!(
                                "embedding attempt {} failed ({}), retrying in {:?}",
                                attempt, err, delay
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Err(err),
                    }
                }
            }
        }
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

/// Normalize an embedding vector to unit length
fn normalize_embedding(embedding: Embedding) -> Embedding {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        embedding.into_iter().map(|x| x / norm).collect()
    } else {
        embedding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(endpoint: String) -> EmbeddingConfig {
        EmbeddingConfig {
            endpoint,
            api_key: Some("sk-test".to_string()),
            model: "text-embedding-3-small".to_string(),
            dimensions: 4,
            timeout_secs: 5,
            max_retries: 2,
        }
    }

    #[test]
    fn normalizes_to_unit_length() {
        let normalized = normalize_embedding(vec![3.0, 4.0]);
        assert!((normalized[0] - 0.6).abs() < 1e-6);
        assert!((normalized[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_stays_zero() {
        assert_eq!(normalize_embedding(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn embeds_a_single_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/embeddings")
                    .header("authorization", "Bearer sk-test")
                    .json_body_partial(r#"{"input": ["hello world"]}"#);
                then.status(200).json_body(json!({
                    "data": [{"embedding": [1.0, 0.0, 0.0, 0.0], "index": 0}]
                }));
            })
            .await;

        let embedder =
            HttpEmbedder::new(test_config(server.url("/v1/embeddings"))).unwrap();
        let vector = embedder.embed("hello world").await.unwrap();

        mock.assert_async().await;
        assert_eq!(vector, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn permanent_api_error_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/embeddings");
                then.status(400).json_body(json!({
                    "error": {"message": "input too long"}
                }));
            })
            .await;

        let embedder =
            HttpEmbedder::new(test_config(server.url("/v1/embeddings"))).unwrap();
        let err = embedder.embed("oops").await.unwrap_err();

        assert_eq!(mock.hits_async().await, 1);
        assert!(matches!(err, EmbeddingError::Http { .. }));
        assert!(err.to_string().contains("input too long"));
    }

    #[tokio::test]
    async fn server_errors_are_retried_up_to_the_limit() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/embeddings");
                then.status(503).body("unavailable");
            })
            .await;

        let embedder =
            HttpEmbedder::new(test_config(server.url("/v1/embeddings"))).unwrap();
        let err = embedder.embed("retry me").await.unwrap_err();

        // max_retries = 2: initial attempt plus one retry
        assert_eq!(mock.hits_async().await, 2);
        assert!(matches!(err, EmbeddingError::Http { .. }));
    }
}
