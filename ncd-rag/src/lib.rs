//! Retrieval pipeline and answering engine for the NCD chatbot.
//!
//! A two-phase RAG system over a fixed corpus of non-communicable-disease
//! documents:
//!
//! - **Offline indexing** — [`loader::DocumentLoader`] reads PDF/TXT files,
//!   [`chunking::RecursiveChunker`] splits them into overlapping chunks, and
//!   [`store::IndexStore`] embeds and persists them
//!   ([`pipeline::IngestionPipeline`] orchestrates both the first-time build
//!   and incremental, dedup-by-origin updates).
//! - **Online querying** — [`retriever::Retriever`] performs a fixed-k
//!   similarity lookup and [`chatbot::Chatbot`] assembles a single prompt and
//!   invokes a [`generation::Generator`] for the answer, optionally
//!   attaching source citations.
//!
//! Embedding and generation backends are selected at construction time
//! behind the [`embedding::Embedder`] and [`generation::Generator`] traits;
//! see [`config::AppSettings`].

pub mod chatbot;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod generation;
pub mod loader;
pub mod local;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod store;
pub mod vectorstore;

pub use chatbot::Chatbot;
pub use chunking::{Chunker, RecursiveChunker};
pub use config::{AppSettings, EmbeddingBackend, RagConfig};
pub use document::{AnswerResponse, Chunk, DocumentRecord, ScoredChunk, SourceRef};
pub use embedding::Embedder;
pub use error::{RagError, Result};
pub use gemini::GeminiGenerator;
pub use generation::Generator;
pub use loader::DocumentLoader;
pub use local::HashEmbedder;
pub use openai::OpenAiEmbedder;
pub use pipeline::{BuildReport, IngestionPipeline, UpdateReport};
pub use retriever::Retriever;
pub use store::{IndexStore, StoredChunk};
pub use vectorstore::VectorIndex;
