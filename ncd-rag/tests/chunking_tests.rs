//! Property tests for the recursive chunker.

use ncd_rag::chunking::{Chunker, RecursiveChunker};
use ncd_rag::document::DocumentRecord;
use proptest::prelude::*;

/// Generate prose-like text with paragraph and sentence boundaries.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z ]{0,80}(\\. [a-z ]{0,80}){0,5}(\n\n[a-z ]{0,80}){0,3}"
}

/// Generate a (chunk_size, chunk_overlap) pair with overlap < size.
fn arb_sizes() -> impl Strategy<Value = (usize, usize)> {
    (10usize..120).prop_flat_map(|size| (Just(size), 0usize..size))
}

/// Check that the chunks tile the original text: each chunk is a contiguous
/// character slice of `text`, starting at most `overlap` characters before
/// the previous chunk's end, and the last chunk runs to the end of the text.
fn chunks_tile_text_within_overlap(text: &str, chunks: &[&str], overlap: usize) -> bool {
    let text: Vec<char> = text.chars().collect();
    let chunks: Vec<Vec<char>> = chunks.iter().map(|c| c.chars().collect()).collect();
    resumes_within_window(&text, &chunks, 0, 0, overlap)
}

/// Backtracking walk: chunk `i` must match `text` at some start position in
/// `[pos - overlap, pos]`, where `pos` is where the previous chunk ended.
fn resumes_within_window(
    text: &[char],
    chunks: &[Vec<char>],
    i: usize,
    pos: usize,
    overlap: usize,
) -> bool {
    let Some(chunk) = chunks.get(i) else {
        return pos == text.len();
    };
    (pos.saturating_sub(overlap)..=pos).rev().any(|start| {
        text.len() >= start + chunk.len()
            && text[start..start + chunk.len()] == chunk[..]
            && resumes_within_window(text, chunks, i + 1, start + chunk.len(), overlap)
    })
}

/// Length of the longest suffix of `prev` that is also a prefix of `next`,
/// in characters.
fn shared_boundary_len(prev: &str, next: &str) -> usize {
    let prev: Vec<char> = prev.chars().collect();
    let next: Vec<char> = next.chars().collect();
    (0..=prev.len().min(next.len()))
        .rev()
        .find(|&n| prev[prev.len() - n..] == next[..n])
        .unwrap_or(0)
}

/// With distinct-letter words, any text shared across a chunk boundary can
/// only be the carried overlap, so the suffix/prefix measurement is exact.
#[test]
fn boundary_text_shared_between_chunks_never_exceeds_chunk_overlap() {
    let text = "ab cd ef gh ij kl mn op qr st uv wx yz";
    for (size, overlap) in [(10, 3), (12, 0), (8, 4)] {
        let chunker = RecursiveChunker::new(size, overlap);
        let chunks = chunker.chunk(&DocumentRecord::new(text, "doc.txt"));
        assert!(chunks.len() > 1, "expected multiple chunks for size {size}");
        for pair in chunks.windows(2) {
            let shared = shared_boundary_len(&pair[0].text, &pair[1].text);
            assert!(
                shared <= overlap,
                "chunks share {shared} boundary chars, overlap is {overlap}: {:?} / {:?}",
                pair[0].text,
                pair[1].text,
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every chunk stays within the configured size, measured in characters.
    #[test]
    fn chunks_never_exceed_chunk_size(text in arb_text(), (size, overlap) in arb_sizes()) {
        let chunker = RecursiveChunker::new(size, overlap);
        let chunks = chunker.chunk(&DocumentRecord::new(text, "doc.txt"));
        for chunk in &chunks {
            prop_assert!(
                chunk.text.chars().count() <= size,
                "chunk of {} chars exceeds size {}",
                chunk.text.chars().count(),
                size,
            );
        }
    }

    /// Every chunk carries its record's origin and a sequential index.
    #[test]
    fn chunks_preserve_origin_and_order(text in arb_text(), (size, overlap) in arb_sizes()) {
        let chunker = RecursiveChunker::new(size, overlap);
        let chunks = chunker.chunk(&DocumentRecord::new(text, "origin.pdf"));
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.origin.as_str(), "origin.pdf");
            prop_assert_eq!(chunk.chunk_index, i);
        }
    }

    /// Consecutive chunks of a record overlap by at most `chunk_overlap`
    /// characters: every chunk is a contiguous slice of the record that
    /// resumes no more than `chunk_overlap` characters before the previous
    /// chunk ended, and together the chunks cover the whole record.
    #[test]
    fn consecutive_chunks_overlap_by_at_most_chunk_overlap(
        text in arb_text(),
        (size, overlap) in arb_sizes(),
    ) {
        let chunker = RecursiveChunker::new(size, overlap);
        let chunks = chunker.chunk(&DocumentRecord::new(text.clone(), "doc.txt"));
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        prop_assert!(
            chunks_tile_text_within_overlap(&text, &texts, overlap),
            "chunks {:?} do not tile {:?} within overlap {}",
            texts,
            text,
            overlap,
        );
    }

    /// Non-empty text yields at least one chunk; empty text yields none.
    #[test]
    fn chunk_count_matches_content(text in arb_text(), (size, overlap) in arb_sizes()) {
        let chunker = RecursiveChunker::new(size, overlap);
        let chunks = chunker.chunk(&DocumentRecord::new(text.clone(), "doc.txt"));
        if text.is_empty() {
            prop_assert!(chunks.is_empty());
        } else {
            prop_assert!(!chunks.is_empty());
        }
    }

    /// Text that already fits in one chunk is returned whole, unmodified.
    #[test]
    fn short_text_is_a_single_untouched_chunk(
        text in "[a-z ]{1,40}",
        overlap in 0usize..50,
    ) {
        let chunker = RecursiveChunker::new(50, overlap.min(49));
        let chunks = chunker.chunk(&DocumentRecord::new(text.clone(), "doc.txt"));
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(chunks[0].text.as_str(), text.as_str());
    }

    /// Chunks never mix content across records.
    #[test]
    fn records_are_split_independently(
        first in "[a-f ]{1,120}",
        second in "[g-l ]{1,120}",
        (size, overlap) in arb_sizes(),
    ) {
        let chunker = RecursiveChunker::new(size, overlap);
        let records = vec![
            DocumentRecord::new(first, "first.txt"),
            DocumentRecord::new(second, "second.txt"),
        ];
        let chunks = chunker.split_records(&records);
        for chunk in &chunks {
            match chunk.origin.as_str() {
                "first.txt" => prop_assert!(!chunk.text.contains(|c: char| ('g'..='l').contains(&c))),
                "second.txt" => prop_assert!(!chunk.text.contains(|c: char| ('a'..='f').contains(&c))),
                other => prop_assert!(false, "unexpected origin {}", other),
            }
        }
    }
}
