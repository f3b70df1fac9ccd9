//! Qdrant REST client

use super::{StoreError, StoreResult, VectorStore};
use crate::config::StoreConfig;
use crate::types::EmbeddedPoint;
use crate::util::{is_transient, retry_backoff, should_retry};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Qdrant client speaking the REST API, with bounded retry on transient
/// failures
pub struct QdrantStore {
    client: Client,
    config: StoreConfig,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    points: [&'a EmbeddedPoint; 1],
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

impl QdrantStore {
    /// Create a new Qdrant client
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(
            "initializing Qdrant client: url={}, collection={}",
            config.url, config.collection
        );

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            headers.insert(
                "api-key",
                HeaderValue::from_str(key.trim())
                    .map_err(|e| StoreError::Config(format!("invalid Qdrant API key: {}", e)))?,
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: StoreConfig {
                url: config.url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    /// Collection this client writes to
    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Create the target collection if it does not exist yet.
    ///
    /// A fresh Qdrant instance has no collections; calling this once before
    /// seeding makes the first upsert work out of the box. An existing
    /// collection is left untouched.
    pub async fn ensure_collection(&self, dimensions: usize) -> StoreResult<()> {
        let url = format!("{}/collections/{}", self.config.url, self.config.collection);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            status if status.is_success() => {
                debug!("collection '{}' already exists", self.config.collection);
                return Ok(());
            }
            StatusCode::NOT_FOUND => {}
            status => {
                let message = response.text().await.unwrap_or_default();
                return Err(StoreError::Rejected { status, message });
            }
        }

        info!(
            "creating collection '{}' ({} dimensions, cosine distance)",
            self.config.collection, dimensions
        );
        let request = CreateCollectionRequest {
            vectors: VectorParams {
                size: dimensions,
                distance: "Cosine",
            },
        };
        let response = self.client.put(&url).json(&request).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(StoreError::Rejected { status, message })
        }
    }

    /// One upsert request, no retries
    async fn request_upsert(&self, point: &EmbeddedPoint) -> StoreResult<()> {
        let url = format!(
            "{}/collections/{}/points?wait=true",
            self.config.url, self.config.collection
        );
        let request = UpsertRequest { points: [point] };

        let response = self.client.put(&url).json(&request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_string());
        Err(StoreError::Rejected { status, message })
    }

    /// Whether the failed attempt should be retried
    fn retryable(&self, err: &StoreError, attempt: usize) -> bool {
        if attempt >= self.config.max_retries {
            return false;
        }
        match err {
            StoreError::Rejected { status, .. } => should_retry(*status),
            StoreError::Network(e) => is_transient(e),
            StoreError::Config(_) => false,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn upsert(&self, point: EmbeddedPoint) -> StoreResult<()> {
        let mut attempt = 0usize;
        loop {
            match self.request_upsert(&point).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    attempt += 1;
                    if self.retryable(&err, attempt) {
                        let delay = retry_backoff(attempt);
                        debug!(
                            "upsert attempt {} failed ({}), retrying in {:?}",
                            attempt, err, delay
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        return Err(err);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(url: String) -> StoreConfig {
        StoreConfig {
            url,
            api_key: None,
            collection: "wikipedia".to_string(),
            timeout_secs: 5,
            max_retries: 2,
        }
    }

    fn test_point() -> EmbeddedPoint {
        let chunk = Chunk {
            article_id: "1".to_string(),
            title: "Alpha".to_string(),
            index: 0,
            text: "Para one.".to_string(),
        };
        EmbeddedPoint::from_chunk(&chunk, vec![0.1, 0.2, 0.3])
    }

    #[tokio::test]
    async fn upserts_a_point() {
        let server = MockServer::start_async().await;
        let point = test_point();
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/collections/wikipedia/points")
                    .query_param("wait", "true")
                    .json_body_partial(format!(r#"{{"points": [{{"id": "{}"}}]}}"#, point.id));
                then.status(200).json_body(json!({"status": "ok"}));
            })
            .await;

        let store = QdrantStore::new(test_config(server.base_url())).unwrap();
        store.upsert(point).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejection_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/collections/wikipedia/points");
                then.status(400).body("bad vector size");
            })
            .await;

        let store = QdrantStore::new(test_config(server.base_url())).unwrap();
        let err = store.upsert(test_point()).await.unwrap_err();

        assert_eq!(mock.hits_async().await, 1);
        assert!(matches!(err, StoreError::Rejected { .. }));
        assert!(err.to_string().contains("bad vector size"));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/collections/wikipedia/points");
                then.status(503).body("unavailable");
            })
            .await;

        let store = QdrantStore::new(test_config(server.base_url())).unwrap();
        let err = store.upsert(test_point()).await.unwrap_err();

        // max_retries = 2: initial attempt plus one retry
        assert_eq!(mock.hits_async().await, 2);
        assert!(matches!(err, StoreError::Rejected { .. }));
    }

    #[tokio::test]
    async fn ensure_collection_creates_when_missing() {
        let server = MockServer::start_async().await;
        let get_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/collections/wikipedia");
                then.status(404).body("not found");
            })
            .await;
        let put_mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/collections/wikipedia")
                    .json_body(json!({"vectors": {"size": 1536, "distance": "Cosine"}}));
                then.status(200).json_body(json!({"result": true}));
            })
            .await;

        let store = QdrantStore::new(test_config(server.base_url())).unwrap();
        store.ensure_collection(1536).await.unwrap();

        get_mock.assert_async().await;
        put_mock.assert_async().await;
    }

    #[tokio::test]
    async fn ensure_collection_leaves_existing_alone() {
        let server = MockServer::start_async().await;
        let get_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/collections/wikipedia");
                then.status(200).json_body(json!({"result": {"status": "green"}}));
            })
            .await;

        let store = QdrantStore::new(test_config(server.base_url())).unwrap();
        store.ensure_collection(1536).await.unwrap();
        get_mock.assert_async().await;
    }
}
