//! Local deterministic embedding provider.
//!
//! [`HashEmbedder`] needs no API key and no network: it derives a direction
//! from a byte hash of the text and L2-normalises the result. It backs the
//! `EMBEDDING_PROVIDER=local` configuration and the test suites.

use async_trait::async_trait;

use crate::embedding::Embedder;
use crate::error::Result;

/// Default dimensionality for locally computed embeddings.
const DEFAULT_DIMENSIONS: usize = 256;

/// A deterministic, offline [`Embedder`].
///
/// Identical texts always map to identical vectors, so similarity search
/// over a store built with this provider is fully reproducible.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl HashEmbedder {
    /// Create a new embedder producing vectors of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        // Word-level hashing so texts sharing vocabulary land near each
        // other, unlike a single whole-text hash.
        let mut emb = vec![0.0f32; self.dimensions];
        for word in text.split_whitespace() {
            let lowered = word.to_lowercase();
            let token: String =
                lowered.chars().filter(|c| c.is_alphanumeric()).collect();
            if token.is_empty() {
                continue;
            }
            let hash =
                token.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            for (i, v) in emb.iter_mut().enumerate() {
                *v += ((hash.wrapping_add(i as u64)) as f32).sin();
            }
        }
        // L2-normalise so cosine similarity is just the dot product.
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        emb
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed_query("diabetes symptoms").await.unwrap();
        let b = embedder.embed_query("diabetes symptoms").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), embedder.dimensions());
    }

    #[tokio::test]
    async fn shared_vocabulary_scores_higher() {
        let embedder = HashEmbedder::default();
        let doc = embedder.embed_query("diabetes is a metabolic disease").await.unwrap();
        let close = embedder.embed_query("what is diabetes").await.unwrap();
        let far = embedder.embed_query("quarterly revenue projections").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&doc, &close) > dot(&doc, &far));
    }
}
