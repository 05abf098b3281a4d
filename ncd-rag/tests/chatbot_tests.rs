//! Answering engine tests with counting mock providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ncd_rag::{Chatbot, Chunk, Generator, RagError, Result, Retriever, ScoredChunk, VectorIndex};

/// A vector index returning canned chunks and counting searches.
struct CountingIndex {
    calls: AtomicUsize,
    chunks: Vec<Chunk>,
}

impl CountingIndex {
    fn new(chunks: Vec<Chunk>) -> Self {
        Self { calls: AtomicUsize::new(0), chunks }
    }
}

#[async_trait]
impl VectorIndex for CountingIndex {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .chunks
            .iter()
            .take(k)
            .cloned()
            .map(|chunk| ScoredChunk { chunk, score: 1.0 })
            .collect())
    }
}

/// A generator returning a canned answer and counting invocations.
struct CountingGenerator {
    calls: AtomicUsize,
}

impl CountingGenerator {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl Generator for CountingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("Diabetes is a chronic metabolic disease.".to_string())
    }
}

struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(RagError::Generation { provider: "Mock".into(), message: "upstream outage".into() })
    }
}

fn chunk(text: &str, origin: &str) -> Chunk {
    Chunk { text: text.into(), origin: origin.into(), chunk_index: 0 }
}

fn engine(
    chunks: Vec<Chunk>,
) -> (Chatbot, Arc<CountingIndex>, Arc<CountingGenerator>) {
    let index = Arc::new(CountingIndex::new(chunks));
    let generator = Arc::new(CountingGenerator::new());
    let chatbot = Chatbot::new(
        Retriever::new(Arc::clone(&index) as Arc<dyn VectorIndex>, 4),
        Arc::clone(&generator) as Arc<dyn Generator>,
    );
    (chatbot, index, generator)
}

#[tokio::test]
async fn blank_questions_get_fallback_without_retrieval_or_generation() {
    let (chatbot, index, generator) = engine(vec![chunk("text", "a.txt")]);

    for question in ["", "   ", "\t\n"] {
        let response = chatbot.ask(question, true).await.unwrap();
        assert_eq!(response.answer, "Please provide a valid question.");
        assert!(response.sources.is_empty());
    }

    assert_eq!(index.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn sources_are_bounded_by_k_and_preserve_retrieval_order() {
    let chunks = vec![
        chunk("first chunk", "a.txt"),
        chunk("second chunk", "b.txt"),
        chunk("third chunk", "c.txt"),
        chunk("fourth chunk", "d.txt"),
        chunk("fifth chunk", "e.txt"),
    ];
    let (chatbot, _, _) = engine(chunks);

    let response = chatbot.ask("what is diabetes", true).await.unwrap();
    assert_eq!(response.sources.len(), 4);
    let origins: Vec<&str> = response.sources.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(origins, vec!["a.txt", "b.txt", "c.txt", "d.txt"]);
}

#[tokio::test]
async fn source_previews_are_truncated_to_300_characters() {
    let long = "d".repeat(450);
    let (chatbot, _, _) = engine(vec![chunk(&long, "long.txt"), chunk("short", "short.txt")]);

    let response = chatbot.ask("question", true).await.unwrap();
    assert_eq!(response.sources[0].content.chars().count(), 300);
    assert_eq!(response.sources[1].content, "short");
}

#[tokio::test]
async fn sources_are_omitted_unless_requested() {
    let (chatbot, _, generator) = engine(vec![chunk("text", "a.txt")]);

    let response = chatbot.ask("what is diabetes", false).await.unwrap();
    assert!(response.sources.is_empty());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn generation_failures_propagate_without_retry() {
    let index = Arc::new(CountingIndex::new(vec![chunk("text", "a.txt")]));
    let chatbot = Chatbot::new(
        Retriever::new(Arc::clone(&index) as Arc<dyn VectorIndex>, 4),
        Arc::new(FailingGenerator),
    );

    let result = chatbot.ask("what is diabetes", false).await;
    assert!(matches!(result, Err(RagError::Generation { .. })));
    assert_eq!(index.calls.load(Ordering::SeqCst), 1);
}
