//! Streaming extraction of articles from MediaWiki XML dumps
//!
//! The dump is consumed as a single forward stream: bzip2 decompression
//! feeds an incremental XML parser, and a small state machine folds parser
//! events into [`ArticleRecord`]s one page at a time. Nothing is ever
//! buffered beyond the page currently being assembled, so memory use is
//! independent of dump size.

mod assembler;
mod reader;

pub use assembler::RecordAssembler;
pub use reader::DumpReader;

use crate::types::ArticleRecord;
use quick_xml::events::Event;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while reading a dump
///
/// All of these are fatal for the run: once the byte stream or the markup
/// is broken, later block boundaries cannot be trusted.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("XML parse error: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for DumpError {
    fn from(e: quick_xml::Error) -> Self {
        match e {
            // Read failures mid-stream (including corrupt bzip2 data
            // surfacing through the decoder) are stream errors, not markup
            // errors.
            quick_xml::Error::Io(inner) => DumpError::Stream(inner.to_string()),
            other => DumpError::Xml(other.to_string()),
        }
    }
}

/// A MediaWiki XML dump opened for streaming iteration
///
/// Yields one [`ArticleRecord`] per `<page>` element, in document order.
pub struct WikimediaSource {
    path: PathBuf,
    reader: DumpReader,
    assembler: RecordAssembler,
    buf: Vec<u8>,
}

impl WikimediaSource {
    /// Open a dump file (`.xml.bz2` or plain `.xml`, chosen by extension)
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DumpError> {
        let path = path.as_ref().to_path_buf();
        let reader = DumpReader::open(&path)?;
        Ok(Self {
            path,
            reader,
            assembler: RecordAssembler::new(),
            buf: Vec::with_capacity(8192),
        })
    }

    /// File name of the underlying dump, for display
    pub fn source_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("wikimedia dump")
    }

    /// Read events until the next complete article or end of stream
    fn next_article(&mut self) -> Result<Option<ArticleRecord>, DumpError> {
        loop {
            let event = self.reader.read_event(&mut self.buf)?;
            if let Event::Eof = event {
                if self.assembler.in_record() {
                    warn!("dump ended inside an open page element; discarding partial article");
                }
                return Ok(None);
            }
            if let Some(record) = self.assembler.feed(&event) {
                return Ok(Some(record));
            }
        }
    }
}

impl Iterator for WikimediaSource {
    type Item = Result<ArticleRecord, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_article() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
