//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`], a
//! boundary-preferring splitter: it tries to end each chunk on a paragraph
//! break, then a sentence break, then a word break, and only cuts
//! mid-word when no better boundary fits. Sizes and overlap are measured in
//! characters so the behavior is identical for ASCII and CJK text.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text, metadata, and a
/// `start_offset`, but no embeddings. Embeddings are attached later by the
/// pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Paragraph separators, tried first.
const PARAGRAPH_SEPARATORS: &[&str] = &["\n\n"];
/// Sentence separators, tried next. Covers both Latin and CJK punctuation.
const SENTENCE_SEPARATORS: &[&str] = &[". ", "! ", "? ", "。", "！", "？", "\n"];
/// Word separators, the last resort before a hard character cut.
const WORD_SEPARATORS: &[&str] = &[" ", "，", "、"];

/// Splits text into chunks of at most `chunk_size` characters, preferring
/// natural boundaries, with `chunk_overlap` characters repeated between
/// consecutive chunks.
///
/// A chunk boundary is chosen by scanning backwards from the size limit for
/// the highest-ranked separator; the separator stays attached to the
/// preceding chunk. The next chunk starts `chunk_overlap` characters before
/// the previous chunk ended, so context is preserved across boundaries. A
/// document that fits in a single chunk is returned as-is with no overlap
/// duplication.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk
/// inherits the parent document's metadata plus a `chunk_index` field, and
/// records its character offset into the source document.
///
/// # Example
///
/// ```rust,ignore
/// use raven_rag::chunking::{Chunker, RecursiveChunker};
///
/// let chunker = RecursiveChunker::new(1000, 200);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// `chunk_overlap` must be smaller than `chunk_size`; the config builder
    /// enforces this before a chunker is ever constructed.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Find the best boundary in `(min_end, hard_end]`, in character units.
    ///
    /// Scans separator levels in preference order and picks the latest
    /// occurrence of any separator at that level. Returns `hard_end` (a hard
    /// character cut) when no separator qualifies.
    fn best_break(&self, text: &str, char_starts: &[usize], min_end: usize, hard_end: usize) -> usize {
        let window = &text[char_starts[min_end]..char_starts[hard_end]];

        for level in [PARAGRAPH_SEPARATORS, SENTENCE_SEPARATORS, WORD_SEPARATORS] {
            let mut best: Option<usize> = None;
            for sep in level {
                if let Some(pos) = window.rfind(sep) {
                    // Break after the separator so it stays with the tail of
                    // the preceding chunk.
                    let byte_end = char_starts[min_end] + pos + sep.len();
                    let char_end = char_starts.partition_point(|&b| b < byte_end);
                    if char_end > min_end {
                        best = Some(best.map_or(char_end, |b: usize| b.max(char_end)));
                    }
                }
            }
            if let Some(end) = best {
                return end;
            }
        }

        hard_end
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let text = &document.text;
        // Byte offset of every character boundary, plus the end sentinel, so
        // character positions map to byte positions in O(1).
        let mut char_starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_starts.push(text.len());
        let total_chars = char_starts.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        loop {
            let hard_end = (start + self.chunk_size).min(total_chars);
            let end = if hard_end == total_chars {
                total_chars
            } else {
                // Only accept boundaries far enough past `start` that the
                // overlapped next chunk still makes progress.
                self.best_break(text, &char_starts, start + self.chunk_overlap + 1, hard_end)
            };

            let mut metadata = document.metadata.clone();
            metadata.insert("chunk_index".to_string(), chunk_index.to_string());
            metadata.insert("start_index".to_string(), start.to_string());

            chunks.push(Chunk {
                id: format!("{}_{chunk_index}", document.id),
                text: text[char_starts[start]..char_starts[end]].to_string(),
                embedding: Vec::new(),
                metadata,
                document_id: document.id.clone(),
                start_offset: start,
            });
            chunk_index += 1;

            if end == total_chars {
                break;
            }
            start = end - self.chunk_overlap;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::new("doc", text)
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        let chunker = RecursiveChunker::new(100, 20);
        assert!(chunker.chunk(&doc("")).is_empty());
    }

    #[test]
    fn short_document_yields_single_chunk() {
        let chunker = RecursiveChunker::new(100, 20);
        let chunks = chunker.chunk(&doc("short"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short");
        assert_eq!(chunks[0].start_offset, 0);
        assert_eq!(chunks[0].id, "doc_0");
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        let text = format!("{}\n\n{}", "a".repeat(50), "b".repeat(50));
        let chunker = RecursiveChunker::new(80, 10);
        let chunks = chunker.chunk(&doc(&text));
        // First chunk ends right after the paragraph separator.
        assert!(chunks[0].text.ends_with("\n\n"));
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let text = "word ".repeat(100);
        let chunker = RecursiveChunker::new(60, 15);
        let chunks = chunker.chunk(&doc(&text));
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let prev_end = pair[0].start_offset + pair[0].text.chars().count();
            assert_eq!(pair[1].start_offset, prev_end - 15);
        }
    }

    #[test]
    fn cjk_text_splits_on_character_boundaries() {
        let text = "你好世界。".repeat(60);
        let chunker = RecursiveChunker::new(100, 20);
        let chunks = chunker.chunk(&doc(&text));
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 100);
        }
    }
}
