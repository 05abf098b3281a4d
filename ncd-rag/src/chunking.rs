//! Document chunking.
//!
//! [`RecursiveChunker`] splits hierarchically on paragraph breaks, then
//! sentence breaks, then whitespace, falling back to a hard character cut.
//! The trailing `chunk_overlap` characters of each chunk are carried into the
//! next chunk of the same record so adjacent chunks share context.

use tracing::debug;

use crate::document::{Chunk, DocumentRecord};

/// A strategy for splitting records into chunks.
///
/// Implementations produce [`Chunk`]s tagged with their record's origin.
/// Embeddings are attached later by the index store.
pub trait Chunker: Send + Sync {
    /// Split a single record into chunks.
    ///
    /// Returns an empty `Vec` if the record has empty text.
    fn chunk(&self, record: &DocumentRecord) -> Vec<Chunk>;

    /// Split a sequence of records, preserving record order.
    ///
    /// An empty input sequence is a no-op, not an error.
    fn split_records(&self, records: &[DocumentRecord]) -> Vec<Chunk> {
        if records.is_empty() {
            debug!("no records to split");
            return Vec::new();
        }
        records.iter().flat_map(|r| self.chunk(r)).collect()
    }
}

/// Separator hierarchy: paragraphs, sentence ends, then single spaces.
const SEPARATORS: [&str; 5] = ["\n\n", ". ", "! ", "? ", " "];

/// Splits text recursively by semantic boundaries with overlap between
/// consecutive chunks.
///
/// Sizes and overlap are measured in characters, and all slicing happens on
/// character boundaries.
///
/// # Example
///
/// ```rust,ignore
/// use ncd_rag::chunking::{Chunker, RecursiveChunker};
///
/// let chunker = RecursiveChunker::new(1000, 200);
/// let chunks = chunker.chunk(&record);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per chunk
    /// * `chunk_overlap` — characters of trailing context carried into the next chunk
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, record: &DocumentRecord) -> Vec<Chunk> {
        if record.text.is_empty() {
            return Vec::new();
        }

        let pieces =
            split_and_merge(&record.text, self.chunk_size, self.chunk_overlap, &SEPARATORS);

        pieces
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk { text, origin: record.origin.clone(), chunk_index: i })
            .collect()
    }
}

/// Number of characters in `text`.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The trailing `overlap` characters of `text` (the whole text if shorter).
fn tail_overlap(text: &str, overlap: usize) -> &str {
    if overlap == 0 {
        return "";
    }
    match text.char_indices().rev().nth(overlap - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Split text by a separator, then merge segments greedily into chunks that
/// respect `chunk_size`. Oversized pieces are split further with the
/// next-level separator; the last resort is a hard character cut.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining = &separators[1..];
    let segments = split_keeping_separator(text, separator);

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if current.is_empty() {
            current = segment.to_string();
        } else if char_len(&current) + char_len(segment) <= chunk_size {
            current.push_str(segment);
        } else {
            flush(&mut chunks, current, chunk_size, chunk_overlap, remaining);
            // Seed the next chunk with trailing context from the last one.
            let carry = chunks.last().map(|c| tail_overlap(c, chunk_overlap)).unwrap_or("");
            current = format!("{carry}{segment}");
        }
    }

    if !current.is_empty() {
        flush(&mut chunks, current, chunk_size, chunk_overlap, remaining);
    }

    chunks
}

/// Push a merged piece, splitting it with finer separators if it exceeds
/// `chunk_size`.
fn flush(
    chunks: &mut Vec<String>,
    piece: String,
    chunk_size: usize,
    chunk_overlap: usize,
    remaining: &[&str],
) {
    if char_len(&piece) > chunk_size {
        chunks.extend(split_and_merge(&piece, chunk_size, chunk_overlap, remaining));
    } else {
        chunks.push(piece);
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Hard character cut with overlap, on char boundaries.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        let step = chunk_size.saturating_sub(chunk_overlap);
        if step == 0 {
            break;
        }
        start += step;
    }

    chunks
}
