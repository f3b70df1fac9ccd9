//! Splitting article bodies into trimmed, non-empty chunks

use crate::config::ChunkingConfig;
use crate::types::{ArticleRecord, Chunk};
use tracing::debug;

/// Splits article bodies into chunks for embedding
///
/// Paragraphs (blank-line separated) are the primary boundary; paragraphs
/// longer than the configured limit are re-split at sentence boundaries and
/// packed greedily. Every emitted chunk is trimmed and non-empty; an empty
/// body yields no chunks.
pub struct ChunkSplitter {
    config: ChunkingConfig,
}

impl ChunkSplitter {
    /// Create a splitter with the given configuration
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Split one article into its chunk sequence
    pub fn split(&self, record: &ArticleRecord) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for paragraph in paragraphs(&record.body) {
            for piece in self.split_paragraph(&paragraph) {
                let text = piece.trim();
                if text.is_empty() {
                    continue;
                }
                chunks.push(Chunk {
                    article_id: record.id.clone(),
                    title: record.title.clone(),
                    index: chunks.len(),
                    text: text.to_string(),
                });
            }
        }

        debug!(
            article_id = %record.id,
            chunks = chunks.len(),
            "split article body"
        );

        chunks
    }

    /// Split a single paragraph, re-breaking it at sentence boundaries when
    /// it exceeds the chunk limit
    fn split_paragraph(&self, paragraph: &str) -> Vec<String> {
        let max = self.config.max_chunk_chars;
        if paragraph.chars().count() <= max {
            return vec![paragraph.to_string()];
        }

        let mut pieces = Vec::new();
        let mut current = String::new();

        for sentence in sentence_spans(paragraph) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            let sentence_len = sentence.chars().count();

            if !current.is_empty() && current.chars().count() + 1 + sentence_len > max {
                pieces.push(std::mem::take(&mut current));
            }

            if sentence_len > max {
                // A single oversized sentence gets packed word by word.
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                pieces.extend(pack_words(sentence, max));
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(sentence);
            }
        }

        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
    }
}

/// Split text into blank-line separated paragraphs
fn paragraphs(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for line in body.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }

    out
}

/// Split text after sentence-final punctuation followed by whitespace
fn sentence_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?') {
            let end = i + c.len_utf8();
            let at_boundary = match iter.peek() {
                Some((_, next)) => next.is_whitespace(),
                None => true,
            };
            if at_boundary {
                spans.push(&text[start..end]);
                start = end;
            }
        }
    }
    if start < text.len() {
        spans.push(&text[start..]);
    }

    spans
}

/// Greedily pack whitespace-separated words into pieces of at most `max`
/// characters; a single word longer than `max` becomes its own piece
fn pack_words(text: &str, max: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !current.is_empty() && current.chars().count() + 1 + word_len > max {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(max_chunk_chars: usize) -> ChunkSplitter {
        ChunkSplitter::new(ChunkingConfig { max_chunk_chars })
    }

    fn record(body: &str) -> ArticleRecord {
        ArticleRecord::new("1", "Alpha", body)
    }

    #[test]
    fn splits_on_paragraph_boundaries() {
        let chunks = splitter(1500).split(&record("Para one.\n\nPara two."));
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Para one.", "Para two."]);
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn empty_body_yields_no_chunks() {
        assert!(splitter(1500).split(&record("")).is_empty());
        assert!(splitter(1500).split(&record("   \n\n  \n")).is_empty());
    }

    #[test]
    fn chunks_are_trimmed_and_non_empty() {
        let chunks = splitter(1500).split(&record("  spaced out  \n\n\n\n\t\n"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "spaced out");
    }

    #[test]
    fn oversized_paragraph_is_split_at_sentence_boundaries() {
        let body = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = splitter(25).split(&record(body));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.text.is_empty());
            assert!(chunk.text.chars().count() <= 25);
        }
        assert_eq!(chunks[0].text, "First sentence here.");
    }

    #[test]
    fn oversized_sentence_is_packed_by_words() {
        let body = "word ".repeat(40);
        let chunks = splitter(20).split(&record(body.trim()));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 20);
        }
    }

    #[test]
    fn splitting_is_deterministic() {
        let body = "Alpha beta. Gamma delta!\n\nEpsilon zeta? Eta theta.";
        let a = splitter(30).split(&record(body));
        let b = splitter(30).split(&record(body));
        assert_eq!(a, b);
    }

    #[test]
    fn no_content_is_lost() {
        let body = "One two three. Four five six!\n\nSeven eight nine.\nTen.";
        let chunks = splitter(20).split(&record(body));
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        assert_eq!(strip(&joined), strip(body));
    }

    #[test]
    fn indices_are_sequential_within_an_article() {
        let body = "A. B. C.\n\nD. E. F.";
        let chunks = splitter(4).split(&record(body));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }
}
