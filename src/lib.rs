//! wikiseed: streaming Wikipedia-dump ingestion into a vector store
//!
//! Reads a bzip2-compressed MediaWiki XML dump as a single forward stream,
//! assembles articles, splits them into chunks, embeds every chunk through
//! an OpenAI-compatible endpoint and upserts the resulting points into
//! Qdrant. Memory use and the number of in-flight embedding requests are
//! both bounded, so dumps of any size can be processed on a small machine.

pub mod chunking;
pub mod config;
pub mod dump;
pub mod embedding;
pub mod pipeline;
pub mod store;
pub mod types;

mod util;

pub use config::Config;
pub use types::*;
