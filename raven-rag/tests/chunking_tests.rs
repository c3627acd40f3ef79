//! Property tests for the recursive chunker's size and overlap guarantees.

use proptest::prelude::*;
use raven_rag::chunking::{Chunker, RecursiveChunker};
use raven_rag::document::Document;

/// Generate (chunk_size, chunk_overlap) pairs with overlap < size.
fn arb_chunk_params() -> impl Strategy<Value = (usize, usize)> {
    (30usize..200).prop_flat_map(|size| (Just(size), 0..size))
}

/// Text mixing words, sentence punctuation, and paragraph breaks.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z]{1,8}([ .!?]|\n|\n\n)?[a-z ]{0,40}".prop_map(|s| s.repeat(8))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every chunk is at most `chunk_size` characters, and each chunk after
    /// the first starts exactly `chunk_overlap` characters before the
    /// previous chunk ended, so the configured overlap is always present
    /// except at the end of the document.
    #[test]
    fn chunks_bounded_and_overlapping(
        text in arb_text(),
        (chunk_size, chunk_overlap) in arb_chunk_params(),
    ) {
        let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
        let document = Document::new("doc", &text);
        let chunks = chunker.chunk(&document);

        let total_chars = text.chars().count();
        prop_assert_eq!(chunks.is_empty(), total_chars == 0);

        for chunk in &chunks {
            prop_assert!(chunk.text.chars().count() <= chunk_size);
        }

        for pair in chunks.windows(2) {
            let prev_end = pair[0].start_offset + pair[0].text.chars().count();
            prop_assert_eq!(pair[1].start_offset, prev_end - chunk_overlap);
        }

        if let (Some(first), Some(last)) = (chunks.first(), chunks.last()) {
            prop_assert_eq!(first.start_offset, 0);
            prop_assert_eq!(last.start_offset + last.text.chars().count(), total_chars);
        }
    }

    /// The overlapped head of each chunk is literally the tail of its
    /// predecessor: the same characters from the same source positions.
    #[test]
    fn overlap_regions_match(
        text in arb_text(),
        (chunk_size, chunk_overlap) in arb_chunk_params(),
    ) {
        prop_assume!(chunk_overlap > 0);
        let chunker = RecursiveChunker::new(chunk_size, chunk_overlap);
        let chunks = chunker.chunk(&Document::new("doc", &text));

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].text.chars().collect();
            let next: Vec<char> = pair[1].text.chars().collect();
            let tail: Vec<char> = prev[prev.len() - chunk_overlap.min(prev.len())..].to_vec();
            let head: Vec<char> = next[..chunk_overlap.min(next.len())].to_vec();
            prop_assert_eq!(tail, head);
        }
    }
}

#[test]
fn chunk_metadata_records_provenance() {
    let mut document = Document::new("episode1_p3", "word ".repeat(40));
    document.metadata.insert("source".to_string(), "episode1.pdf".to_string());

    let chunker = RecursiveChunker::new(60, 10);
    let chunks = chunker.chunk(&document);

    assert!(chunks.len() > 1);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.id, format!("episode1_p3_{i}"));
        assert_eq!(chunk.document_id, "episode1_p3");
        assert_eq!(chunk.metadata.get("source").unwrap(), "episode1.pdf");
        assert_eq!(chunk.metadata.get("chunk_index").unwrap(), &i.to_string());
        assert_eq!(
            chunk.metadata.get("start_index").unwrap(),
            &chunk.start_offset.to_string()
        );
    }
}

#[test]
fn document_shorter_than_overlap_is_one_chunk() {
    let chunker = RecursiveChunker::new(1000, 200);
    let chunks = chunker.chunk(&Document::new("doc", "tiny"));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "tiny");
}

#[test]
fn empty_input_sequence_is_fine() {
    let chunker = RecursiveChunker::new(1000, 200);
    let documents: Vec<Document> = Vec::new();
    let chunks: Vec<_> = documents.iter().flat_map(|d| chunker.chunk(d)).collect();
    assert!(chunks.is_empty());
}
