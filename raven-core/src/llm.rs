//! The language-model trait and the prompt type it consumes.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A fully assembled generation request.
///
/// The prompt assembler folds its three logical inputs (the persona system
/// instruction, the retrieved context block, and the user's question) into
/// the two message payloads every chat backend understands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    /// Persona and behavioral constraints, applied to every request.
    pub system: String,
    /// The user-turn message: rendered context block plus question.
    pub user: String,
}

impl Prompt {
    /// Create a new prompt from its two message payloads.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self { system: system.into(), user: user.into() }
    }
}

/// An ordered, finite stream of answer fragments.
///
/// Fragments concatenate to the full answer. A transport or backend failure
/// surfaces as an `Err` item; the stream terminates after the first error.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A language-model backend.
///
/// Implementations wrap a specific serving profile (an OpenAI-compatible
/// hosted endpoint, a local Ollama server, a test mock) behind a uniform
/// blocking + streaming interface. Backend selection is a construction-time
/// decision; there is no runtime hot-swap.
///
/// # Example
///
/// ```rust,ignore
/// use raven_core::{Llm, Prompt};
///
/// let answer = model.generate(&prompt).await?;
/// let mut stream = model.generate_stream(&prompt).await?;
/// ```
#[async_trait]
pub trait Llm: Send + Sync + std::fmt::Debug {
    /// The model identifier this backend serves, for logging and display.
    fn name(&self) -> &str;

    /// Generate the complete answer for a prompt.
    async fn generate(&self, prompt: &Prompt) -> Result<String>;

    /// Generate the answer incrementally.
    ///
    /// The returned stream yields fragments in order as the backend produces
    /// them. The sequence is not restartable: a new call re-invokes the model
    /// and may yield a different answer under nonzero temperature.
    async fn generate_stream(&self, prompt: &Prompt) -> Result<TokenStream>;
}
