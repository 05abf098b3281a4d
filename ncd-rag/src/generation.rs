//! Generation provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// A single-shot text generation provider.
///
/// One prompt in, one completion out. Implementations hold no conversation
/// state; every call is independent of prior calls.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
