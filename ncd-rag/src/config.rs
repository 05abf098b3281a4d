//! Configuration: retrieval parameters and environment-driven settings.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embedding::Embedder;
use crate::error::{RagError, Result};
use crate::gemini::GeminiGenerator;
use crate::generation::Generator;
use crate::local::HashEmbedder;
use crate::openai::OpenAiEmbedder;

/// Retrieval pipeline parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Characters of overlap between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200, top_k: 4 }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of chunks retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_overlap >= chunk_size` or
    /// `top_k == 0`.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be at least 1".into()));
        }
        Ok(self.config)
    }
}

/// Which embedding backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Hosted embeddings over the OpenAI API.
    OpenAi,
    /// Local deterministic embeddings, no API key required.
    Local,
}

/// Process-level settings read from the environment.
///
/// A `.env` file is honoured via `dotenvy` before variables are read.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Directory scanned for source documents.
    pub data_dir: PathBuf,
    /// Directory holding the persisted index.
    pub persist_dir: PathBuf,
    /// Name of the index collection.
    pub collection_name: String,
    /// Embedding backend selection.
    pub embedding_backend: EmbeddingBackend,
    /// Gemini model used for generation.
    pub gemini_model: String,
}

impl AppSettings {
    /// Read settings from the environment, applying defaults.
    ///
    /// Variables: `DATA_DIR`, `PERSIST_DIR`, `COLLECTION_NAME`,
    /// `EMBEDDING_PROVIDER` (`openai` | `local`), `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let backend = match env_or("EMBEDDING_PROVIDER", "openai").to_ascii_lowercase().as_str() {
            "openai" => EmbeddingBackend::OpenAi,
            "local" => EmbeddingBackend::Local,
            other => {
                return Err(RagError::Config(format!(
                    "unknown EMBEDDING_PROVIDER '{other}' (expected 'openai' or 'local')"
                )))
            }
        };

        Ok(Self {
            data_dir: env_or("DATA_DIR", "data").into(),
            persist_dir: env_or("PERSIST_DIR", "vector_store").into(),
            collection_name: env_or("COLLECTION_NAME", "ncd_diseases"),
            embedding_backend: backend,
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.5-flash"),
        })
    }

    /// Construct the configured embedding provider.
    pub fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        Ok(match self.embedding_backend {
            EmbeddingBackend::OpenAi => Arc::new(OpenAiEmbedder::from_env()?),
            EmbeddingBackend::Local => Arc::new(HashEmbedder::default()),
        })
    }

    /// Construct the configured generation provider.
    pub fn generator(&self) -> Result<Arc<dyn Generator>> {
        Ok(Arc::new(GeminiGenerator::from_env()?.with_model(&self.gemini_model)))
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
