//! Error types for the `ncd-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// The persisted index was not found on `load`.
    ///
    /// Surfaced to callers as "run setup first"; never retried and never
    /// silently replaced by an empty store.
    #[error("index collection '{collection}' not found at {}; run setup first", location.display())]
    NotFound {
        /// The persist directory that was checked.
        location: PathBuf,
        /// The collection that was requested.
        collection: String,
    },

    /// An operation was given zero items where at least one is required.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// An index store operation was invoked before `create` or `load`.
    #[error("index store not initialized: {0}; call create or load first")]
    NotInitialized(String),

    /// The embedding provider failed.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The generation provider failed. Not retried automatically.
    #[error("generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error from the persistence layer or document loader.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A serialization error from the persistence layer.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
