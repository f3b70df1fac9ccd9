//! Core types for the wikiseed pipeline

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an article within a dump
pub type ArticleId = String;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// One article extracted from a MediaWiki dump
///
/// Built incrementally by the record assembler and handed off by value once
/// the closing `</page>` tag is seen; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Page id from the dump (empty if the dump omitted it)
    pub id: ArticleId,
    /// Article title (empty if the dump omitted it)
    pub title: String,
    /// Full body text, concatenated across all text events in document order
    pub body: String,
}

impl ArticleRecord {
    /// Create a record with all fields set (mostly useful in tests)
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// One embeddable unit of text derived from an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Id of the owning article
    pub article_id: ArticleId,
    /// Title of the owning article, carried for the point payload
    pub title: String,
    /// Position of this chunk within the article's chunk sequence
    pub index: usize,
    /// Trimmed, non-empty chunk text
    pub text: String,
}

impl Chunk {
    /// Deterministic point id for this chunk.
    ///
    /// UUIDv5 over `"{article_id}/{index}"` so that re-running a seed
    /// overwrites the same points instead of accumulating duplicates.
    pub fn point_id(&self) -> String {
        let name = format!("{}/{}", self.article_id, self.index);
        Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()).to_string()
    }
}

/// Payload stored alongside each vector for retrieval-time display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointPayload {
    /// Title of the source article
    pub title: String,
    /// Chunk text
    pub text: String,
}

/// The unit persisted to the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedPoint {
    /// Deterministic point id (see [`Chunk::point_id`])
    pub id: String,
    /// Embedding vector returned by the embedding service
    pub vector: Embedding,
    /// Carried-through display payload
    pub payload: PointPayload,
}

impl EmbeddedPoint {
    /// Build a point from a chunk and its embedding
    pub fn from_chunk(chunk: &Chunk, vector: Embedding) -> Self {
        Self {
            id: chunk.point_id(),
            vector,
            payload: PointPayload {
                title: chunk.title.clone(),
                text: chunk.text.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(article_id: &str, index: usize) -> Chunk {
        Chunk {
            article_id: article_id.to_string(),
            title: "Alpha".to_string(),
            index,
            text: "Some text.".to_string(),
        }
    }

    #[test]
    fn point_ids_are_deterministic() {
        assert_eq!(chunk("1", 0).point_id(), chunk("1", 0).point_id());
    }

    #[test]
    fn point_ids_are_distinct_per_chunk() {
        let a = chunk("1", 0).point_id();
        let b = chunk("1", 1).point_id();
        let c = chunk("2", 0).point_id();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn point_id_is_a_valid_uuid() {
        let id = chunk("42", 7).point_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn from_chunk_copies_payload() {
        let c = chunk("1", 0);
        let point = EmbeddedPoint::from_chunk(&c, vec![0.1, 0.2]);
        assert_eq!(point.id, c.point_id());
        assert_eq!(point.payload.title, "Alpha");
        assert_eq!(point.payload.text, "Some text.");
        assert_eq!(point.vector, vec![0.1, 0.2]);
    }
}
