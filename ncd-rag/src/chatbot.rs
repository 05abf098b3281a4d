//! The answering engine: question in, answer plus optional citations out.

use std::sync::Arc;

use tracing::{debug, info};

use crate::document::{AnswerResponse, SourceRef};
use crate::error::Result;
use crate::generation::Generator;
use crate::prompt::build_prompt;
use crate::retriever::Retriever;

/// Fallback answer for blank or whitespace-only questions.
const INVALID_QUESTION_ANSWER: &str = "Please provide a valid question.";

/// Maximum number of characters in a citation's content preview.
const PREVIEW_CHARS: usize = 300;

/// RAG answering engine for non-communicable disease questions.
///
/// Each [`ask`](Chatbot::ask) call is stateless with respect to prior calls:
/// retrieve, assemble one prompt, invoke the generation model once.
pub struct Chatbot {
    retriever: Retriever,
    generator: Arc<dyn Generator>,
}

impl Chatbot {
    /// Create an engine from a retriever and a generation provider.
    pub fn new(retriever: Retriever, generator: Arc<dyn Generator>) -> Self {
        Self { retriever, generator }
    }

    /// Answer a question, optionally attaching source citations.
    ///
    /// Blank or whitespace-only questions short-circuit to a fixed fallback
    /// answer without invoking retrieval or generation.
    ///
    /// # Errors
    ///
    /// Embedding or generation provider failures propagate as
    /// [`crate::error::RagError::Embedding`] /
    /// [`crate::error::RagError::Generation`]; there is no automatic retry.
    pub async fn ask(&self, question: &str, include_sources: bool) -> Result<AnswerResponse> {
        if question.trim().is_empty() {
            debug!("rejected blank question");
            return Ok(AnswerResponse {
                answer: INVALID_QUESTION_ANSWER.to_string(),
                sources: Vec::new(),
            });
        }

        let chunks = self.retriever.retrieve(question).await?;
        debug!(retrieved = chunks.len(), "retrieved context chunks");

        let prompt = build_prompt(&chunks, question);
        let answer = self.generator.generate(&prompt).await?;

        let sources = if include_sources {
            chunks
                .iter()
                .map(|c| SourceRef {
                    source: c.origin.clone(),
                    content: preview(&c.text),
                })
                .collect()
        } else {
            Vec::new()
        };

        info!(question_len = question.len(), sources = sources.len(), "answered question");
        Ok(AnswerResponse { answer, sources })
    }
}

/// First [`PREVIEW_CHARS`] characters of the text, on a char boundary.
fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
