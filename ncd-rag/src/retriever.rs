//! Fixed-k retrieval seam between the index and the answering engine.

use std::sync::Arc;

use crate::document::Chunk;
use crate::error::Result;
use crate::vectorstore::VectorIndex;

/// Wraps a [`VectorIndex`] behind a fixed-k lookup.
///
/// Exists so the answering engine's prompt assembly is decoupled from the
/// store's native API shape.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<dyn VectorIndex>,
    k: usize,
}

impl Retriever {
    /// Create a retriever with the given `k`. Validation of `k >= 1` happens
    /// at config build time; see [`crate::config::RagConfig`].
    pub fn new(index: Arc<dyn VectorIndex>, k: usize) -> Self {
        Self { index, k }
    }

    /// Retrieve up to `k` chunks relevant to the question, most similar first.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Chunk>> {
        let results = self.index.search(question, self.k).await?;
        Ok(results.into_iter().map(|r| r.chunk).collect())
    }
}
