//! Data types for source documents, chunks, and answers.

use serde::{Deserialize, Serialize};

/// A normalized text record produced by the document loader.
///
/// `origin` is a stable identifier for the source file (its file name). It is
/// the only key linking indexed content back to a document, used both for
/// "already indexed" checks and for citation display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRecord {
    /// The extracted text content of the document.
    pub text: String,
    /// Stable identifier of the source document.
    pub origin: String,
}

impl DocumentRecord {
    /// Create a new record.
    pub fn new(text: impl Into<String>, origin: impl Into<String>) -> Self {
        Self { text: text.into(), origin: origin.into() }
    }
}

/// A segment of a [`DocumentRecord`], bounded by the chunker's size limit.
///
/// A chunk never spans multiple records. `chunk_index` is its position within
/// the record it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Origin of the parent [`DocumentRecord`].
    pub origin: String,
    /// Position of this chunk within its record.
    pub chunk_index: usize,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}

/// A citation entry attached to an answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRef {
    /// Origin of the cited chunk.
    pub source: String,
    /// Preview of the cited chunk text, truncated to 300 characters.
    pub content: String,
}

/// The answering engine's output: an answer plus optional citations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// The generated answer text.
    pub answer: String,
    /// Citations in retrieval order, empty unless sources were requested.
    pub sources: Vec<SourceRef>,
}
