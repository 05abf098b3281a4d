//! Read-side contract of a similarity-searchable index.

use async_trait::async_trait;

use crate::document::ScoredChunk;
use crate::error::Result;

/// A queryable index of embedded chunks.
///
/// This is the seam consumed by [`crate::retriever::Retriever`]: the
/// answering engine only needs ranked lookups, not the store's full
/// lifecycle API.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `k` chunks ranked by descending similarity to `query`.
    ///
    /// Returns fewer than `k` if the index holds fewer chunks. Deterministic
    /// for a fixed embedding provider and fixed index contents.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>>;
}
