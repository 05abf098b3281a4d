//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that turns text into vector embeddings.
///
/// Implementations wrap a concrete backend (hosted API or local model)
/// behind a unified async interface; the backend is selected at
/// construction time (see [`crate::config::AppSettings::embedder`]).
///
/// # Example
///
/// ```rust,ignore
/// use ncd_rag::embedding::Embedder;
///
/// let embedding = embedder.embed_query("what is diabetes").await?;
/// assert_eq!(embedding.len(), embedder.dimensions());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding vectors for a batch of document texts.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding vector for a single query.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
