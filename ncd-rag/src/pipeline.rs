//! Ingestion pipeline: first-time index build and incremental updates.

use std::sync::Arc;

use tracing::info;

use crate::chunking::Chunker;
use crate::error::{RagError, Result};
use crate::loader::DocumentLoader;
use crate::store::IndexStore;

/// Outcome of a first-time index build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Documents loaded from the data directory.
    pub documents: usize,
    /// Chunks embedded and persisted.
    pub chunks: usize,
}

/// Outcome of an incremental update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Documents already present and skipped.
    pub skipped_documents: usize,
    /// New documents that were chunked and added.
    pub added_documents: usize,
    /// Chunks appended to the store.
    pub added_chunks: usize,
}

impl UpdateReport {
    /// Whether the update did nothing because every document was already
    /// indexed.
    pub fn is_noop(&self) -> bool {
        self.added_documents == 0
    }
}

/// Orchestrates loader, chunker, and index store for the offline phase.
pub struct IngestionPipeline {
    loader: DocumentLoader,
    chunker: Arc<dyn Chunker>,
    store: Arc<IndexStore>,
}

impl IngestionPipeline {
    /// Create a pipeline over the given collaborators.
    pub fn new(loader: DocumentLoader, chunker: Arc<dyn Chunker>, store: Arc<IndexStore>) -> Self {
        Self { loader, chunker, store }
    }

    /// Build the index from scratch: load every document, chunk, and
    /// [`IndexStore::create`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyInput`] if the data directory holds no
    /// loadable documents.
    pub async fn build(&self) -> Result<BuildReport> {
        let records = self.loader.load_all()?;
        if records.is_empty() {
            return Err(RagError::EmptyInput(format!(
                "no documents found in '{}'",
                self.loader.data_dir().display()
            )));
        }

        let chunks = self.chunker.split_records(&records);
        self.store.create(&chunks).await?;

        let report = BuildReport { documents: records.len(), chunks: chunks.len() };
        info!(documents = report.documents, chunks = report.chunks, "index build complete");
        Ok(report)
    }

    /// Incrementally add new documents to an existing index.
    ///
    /// Dedup policy: load the store, read its existing origins, and keep only
    /// records whose origin is absent. If nothing is new, the whole operation
    /// is a reported no-op and nothing is re-embedded.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotFound`] if there is no existing index to update.
    pub async fn update(&self) -> Result<UpdateReport> {
        self.store.load().await?;
        let existing = self.store.existing_origins().await?;

        let records = self.loader.load_all()?;
        let total = records.len();
        let new_records: Vec<_> =
            records.into_iter().filter(|r| !existing.contains(&r.origin)).collect();

        if new_records.is_empty() {
            info!(existing = existing.len(), "all documents already indexed; nothing to add");
            return Ok(UpdateReport {
                skipped_documents: total,
                added_documents: 0,
                added_chunks: 0,
            });
        }

        let chunks = self.chunker.split_records(&new_records);
        self.store.add_documents(&chunks).await?;

        let report = UpdateReport {
            skipped_documents: total - new_records.len(),
            added_documents: new_records.len(),
            added_chunks: chunks.len(),
        };
        info!(
            added_documents = report.added_documents,
            added_chunks = report.added_chunks,
            skipped = report.skipped_documents,
            "incremental update complete"
        );
        Ok(report)
    }
}
