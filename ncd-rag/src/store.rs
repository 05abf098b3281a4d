//! Persistent index store with cosine similarity search.
//!
//! [`IndexStore`] owns the embedded chunks of one named collection, persisted
//! as a JSON file under a persist directory. Existence of that file is the
//! sole signal distinguishing "first run" from "subsequent run": [`IndexStore::load`]
//! fails with [`RagError::NotFound`] rather than silently creating an empty
//! store.
//!
//! The loaded collection sits behind a `tokio::sync::RwLock`, so one shared
//! store instance can serve concurrent read-only searches while `create` and
//! `add_documents` take the write lock.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::document::{Chunk, ScoredChunk};
use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorIndex;

/// A [`Chunk`] plus its embedding, as persisted in the collection file.
///
/// Never mutated once inserted; removed only by a full rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// The chunk text.
    pub text: String,
    /// Origin of the source document.
    pub origin: String,
    /// Position of the chunk within its record.
    pub chunk_index: usize,
    /// The embedding vector for the chunk text.
    pub embedding: Vec<f32>,
}

impl StoredChunk {
    fn as_chunk(&self) -> Chunk {
        Chunk {
            text: self.text.clone(),
            origin: self.origin.clone(),
            chunk_index: self.chunk_index,
        }
    }
}

/// On-disk representation of one collection.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Collection {
    chunks: Vec<StoredChunk>,
}

/// Durable, queryable store of embedded chunks.
///
/// Identified by a persist directory and a collection name. All operations
/// other than [`create`](IndexStore::create) and [`load`](IndexStore::load)
/// fail with [`RagError::NotInitialized`] until one of those two has
/// succeeded.
pub struct IndexStore {
    persist_dir: PathBuf,
    collection_name: String,
    embedder: Arc<dyn Embedder>,
    collection: RwLock<Option<Collection>>,
}

impl IndexStore {
    /// Create a handle to a (possibly not yet existing) collection.
    pub fn new(
        persist_dir: impl Into<PathBuf>,
        collection_name: impl Into<String>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            persist_dir: persist_dir.into(),
            collection_name: collection_name.into(),
            embedder,
            collection: RwLock::new(None),
        }
    }

    /// The collection file path under the persist directory.
    fn collection_path(&self) -> PathBuf {
        self.persist_dir.join(format!("{}.json", self.collection_name))
    }

    /// Embed `chunks` and persist them as a new collection, replacing any
    /// previous contents at this location.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`] if `chunks` is empty, or an embedding
    /// or persistence error.
    pub async fn create(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Err(RagError::EmptyInput("no chunks provided to create the index".into()));
        }

        let stored = self.embed_chunks(chunks).await?;
        let collection = Collection { chunks: stored };
        self.persist(&collection).await?;

        info!(
            collection = %self.collection_name,
            chunk_count = collection.chunks.len(),
            "created index store"
        );

        *self.collection.write().await = Some(collection);
        Ok(())
    }

    /// Load the persisted collection from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotFound`] if the persist location has no such
    /// collection. Callers use this distinction to decide between first-time
    /// setup and normal operation.
    pub async fn load(&self) -> Result<()> {
        let path = self.collection_path();
        if !path.is_file() {
            return Err(RagError::NotFound {
                location: self.persist_dir.clone(),
                collection: self.collection_name.clone(),
            });
        }

        let raw = tokio::fs::read_to_string(&path).await?;
        let collection: Collection = serde_json::from_str(&raw)?;

        info!(
            collection = %self.collection_name,
            chunk_count = collection.chunks.len(),
            "loaded index store"
        );

        *self.collection.write().await = Some(collection);
        Ok(())
    }

    /// Append embedded chunks to the loaded collection and persist.
    ///
    /// No-ops on empty input. Existing entries are never touched; filtering
    /// out already-indexed origins is the caller's responsibility (see
    /// [`crate::pipeline::IngestionPipeline::update`]).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotInitialized`] without a prior `create` or
    /// `load` in this session.
    pub async fn add_documents(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            info!(collection = %self.collection_name, "no chunks to add");
            return Ok(());
        }

        let stored = self.embed_chunks(chunks).await?;

        let mut guard = self.collection.write().await;
        let collection = guard
            .as_mut()
            .ok_or_else(|| RagError::NotInitialized("add_documents".into()))?;
        collection.chunks.extend(stored);
        self.persist(collection).await?;

        info!(
            collection = %self.collection_name,
            added = chunks.len(),
            total = collection.chunks.len(),
            "added chunks to index store"
        );

        Ok(())
    }

    /// Distinct origins across all stored chunks, sorted ascending.
    pub async fn existing_origins(&self) -> Result<BTreeSet<String>> {
        let guard = self.collection.read().await;
        let collection = guard
            .as_ref()
            .ok_or_else(|| RagError::NotInitialized("existing_origins".into()))?;
        Ok(collection.chunks.iter().map(|c| c.origin.clone()).collect())
    }

    /// Number of chunks currently stored.
    pub async fn chunk_count(&self) -> Result<usize> {
        let guard = self.collection.read().await;
        let collection =
            guard.as_ref().ok_or_else(|| RagError::NotInitialized("chunk_count".into()))?;
        Ok(collection.chunks.len())
    }

    /// Return up to `k` chunks ranked by descending cosine similarity to the
    /// query's embedding.
    ///
    /// The initialization check comes before the query is embedded, so an
    /// uninitialized store never spends an embedding call.
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let guard = self.collection.read().await;
        let collection = guard
            .as_ref()
            .ok_or_else(|| RagError::NotInitialized("similarity_search".into()))?;

        let query_embedding = self.embedder.embed_query(query).await?;

        let mut scored: Vec<ScoredChunk> = collection
            .chunks
            .iter()
            .map(|c| ScoredChunk {
                chunk: c.as_chunk(),
                score: cosine_similarity(&c.embedding, &query_embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<StoredChunk>> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        Ok(chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| StoredChunk {
                text: chunk.text.clone(),
                origin: chunk.origin.clone(),
                chunk_index: chunk.chunk_index,
                embedding,
            })
            .collect())
    }

    /// Write the collection file via a temp file and rename, so a concurrent
    /// `load` never observes a torn write.
    async fn persist(&self, collection: &Collection) -> Result<()> {
        tokio::fs::create_dir_all(&self.persist_dir).await?;
        let path = self.collection_path();
        let tmp = tmp_path(&path);
        let payload = serde_json::to_vec(collection)?;
        tokio::fs::write(&tmp, payload).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[async_trait]
impl VectorIndex for IndexStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        self.similarity_search(query, k).await
    }
}

/// Cosine similarity between two vectors. Returns 0.0 if either vector has
/// zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
