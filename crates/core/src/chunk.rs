//! Document chunks and the fixed-window text splitter

use serde::{Deserialize, Serialize};

/// Source label used for chunks that come from the fallback table
pub const FALLBACK_SOURCE: &str = "fallback";

/// A window of source text, the unit that gets embedded and retrieved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// The chunk text
    pub text: String,

    /// Where the text came from (file path or `fallback`)
    pub source: String,

    /// Index of this chunk within its source
    pub position: usize,

    /// Character offset of the chunk start within its source
    #[serde(default)]
    pub offset: usize,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            position,
            offset: 0,
        }
    }

    /// Builder: set the character offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// A chunk standing in for real retrieval results
    pub fn fallback(text: impl Into<String>, position: usize) -> Self {
        Self::new(text, FALLBACK_SOURCE, position)
    }

    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }
}

/// Splits text into overlapping windows of at most `chunk_size` characters.
///
/// A window is cut at the last whitespace in its second half when there is
/// one, so words are rarely split.
#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(500, 50)
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks tagged with `source`
    pub fn split(&self, text: &str, source: &str) -> Vec<DocumentChunk> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < len {
            while start < len && chars[start].is_whitespace() {
                start += 1;
            }
            if start >= len {
                break;
            }

            let mut end = (start + self.chunk_size).min(len);
            if end < len {
                let floor = start + self.chunk_size / 2;
                if let Some(cut) = (floor..end).rev().find(|&i| chars[i].is_whitespace()) {
                    if cut > start {
                        end = cut;
                    }
                }
            }

            let piece: String = chars[start..end].iter().collect();
            let piece = piece.trim_end();
            if !piece.is_empty() {
                chunks.push(DocumentChunk::new(piece, source, chunks.len()).with_offset(start));
            }

            if end >= len {
                break;
            }

            let next = end.saturating_sub(self.chunk_overlap);
            start = if next > start { next } else { end };
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_respect_window_size() {
        let text = "GraphRAG combines graph databases with retrieval. ".repeat(40);
        let splitter = TextSplitter::new(120, 20);
        let chunks = splitter.split(&text, "doc.txt");

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(chunk.text.chars().count() <= 120);
            assert_eq!(chunk.position, i);
            assert_eq!(chunk.source, "doc.txt");
        }
    }

    #[test]
    fn test_chunks_overlap() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let splitter = TextSplitter::new(20, 8);
        let chunks = splitter.split(text, "doc");

        assert!(chunks.len() >= 2);
        let first_end = chunks[0].offset + chunks[0].text.chars().count();
        assert!(chunks[1].offset < first_end);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = TextSplitter::default().split("  short text  ", "doc");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text");
        assert_eq!(chunks[0].offset, 2);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(TextSplitter::default().split("   \n ", "doc").is_empty());
    }

    #[test]
    fn test_multibyte_text_is_split_on_chars() {
        let text = "é".repeat(25);
        let chunks = TextSplitter::new(10, 2).split(&text, "doc");
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
        assert!(chunks.len() >= 3);
    }

    #[test]
    fn test_overlap_is_clamped() {
        let splitter = TextSplitter::new(5, 10);
        assert_eq!(splitter.chunk_overlap(), 4);
    }
}
