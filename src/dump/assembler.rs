//! State machine folding XML events into article records

use crate::types::ArticleRecord;
use quick_xml::events::Event;

/// The dump elements whose text we capture
const PAGE_TAG: &[u8] = b"page";
const TITLE_TAG: &[u8] = b"title";
const ID_TAG: &[u8] = b"id";
const TEXT_TAG: &[u8] = b"text";

/// Field of the in-progress record that text events currently belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Id,
    Body,
}

/// Folds a stream of XML events into complete [`ArticleRecord`]s.
///
/// Two states: outside a `<page>` element (everything is ignored) and
/// inside one (text is routed to the record field named by the innermost
/// open recognized element). The completed record is handed off by value on
/// `</page>`; the assembler keeps no reference to it afterwards, so one
/// assembler instance can be reused across an entire dump and independent
/// instances never share state.
#[derive(Debug, Default)]
pub struct RecordAssembler {
    current: Option<ArticleRecord>,
    field: Option<Field>,
    /// Set once the page-level `<id>` has been captured; later `<id>`
    /// elements (revision ids, contributor ids) are ignored.
    id_seen: bool,
}

impl RecordAssembler {
    /// Create an assembler in the outside-record state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a page element is currently open
    pub fn in_record(&self) -> bool {
        self.current.is_some()
    }

    /// Feed one parser event.
    ///
    /// Returns a completed record when the event closes a page element,
    /// `None` otherwise.
    pub fn feed(&mut self, event: &Event<'_>) -> Option<ArticleRecord> {
        match event {
            Event::Start(e) => {
                self.on_open(e.name().as_ref());
                None
            }
            Event::Text(e) => {
                if let Ok(text) = e.unescape() {
                    self.on_text(&text);
                }
                None
            }
            Event::CData(e) => {
                if let Ok(text) = String::from_utf8(e.to_vec()) {
                    self.on_text(&text);
                }
                None
            }
            Event::End(e) => self.on_close(e.name().as_ref()),
            _ => None,
        }
    }

    fn on_open(&mut self, name: &[u8]) {
        if name == PAGE_TAG {
            self.current = Some(ArticleRecord::default());
            self.field = None;
            self.id_seen = false;
            return;
        }

        let Some(record) = self.current.as_mut() else {
            return;
        };

        self.field = match name {
            // A fresh title element replaces whatever was captured before;
            // text events within it still concatenate.
            TITLE_TAG => {
                record.title.clear();
                Some(Field::Title)
            }
            ID_TAG if !self.id_seen => {
                record.id.clear();
                Some(Field::Id)
            }
            TEXT_TAG => Some(Field::Body),
            _ => None,
        };
    }

    fn on_text(&mut self, text: &str) {
        let (Some(record), Some(field)) = (self.current.as_mut(), self.field) else {
            return;
        };
        match field {
            Field::Title => record.title.push_str(text),
            Field::Id => record.id.push_str(text),
            // Body text arrives in pieces; always append, never overwrite.
            Field::Body => record.body.push_str(text),
        }
    }

    fn on_close(&mut self, name: &[u8]) -> Option<ArticleRecord> {
        if name == PAGE_TAG {
            self.field = None;
            return self.current.take();
        }
        if self.field == Some(Field::Id) && name == ID_TAG {
            self.id_seen = true;
        }
        self.field = None;
        None
    }
}
