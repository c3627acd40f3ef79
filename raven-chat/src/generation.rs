//! The never-crash generation boundary.
//!
//! [`GenerationClient`] wraps an [`Llm`] and converts every transport or
//! backend failure into user-visible text: the blocking path returns an
//! error-annotated string, the streaming path yields the error message as
//! one final fragment and terminates. Nothing propagates past this boundary
//! as an error, so the chat loop cannot be taken down by a flaky backend.

use std::pin::Pin;
use std::sync::{Arc, OnceLock};

use async_stream::stream;
use futures::{Stream, StreamExt};
use regex::Regex;
use tracing::error;

use raven_core::{Llm, Prompt};

/// An ordered, finite stream of answer fragments with errors already
/// folded into text.
pub type AnswerStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Wraps a model backend with the error-to-text policy.
#[derive(Clone)]
pub struct GenerationClient {
    llm: Arc<dyn Llm>,
}

impl GenerationClient {
    /// Create a client over the given backend.
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self { llm }
    }

    /// The identifier of the wrapped model.
    pub fn model_name(&self) -> &str {
        self.llm.name()
    }

    /// Generate the complete answer; a failure comes back as error text.
    ///
    /// Reasoning models may prefix their reply with a `<think>` block; it is
    /// stripped here so callers and the speech synthesizer only see the
    /// spoken answer.
    pub async fn answer(&self, prompt: &Prompt) -> String {
        match self.llm.generate(prompt).await {
            Ok(text) => strip_reasoning(&text).to_string(),
            Err(e) => {
                error!(model = self.llm.name(), error = %e, "generation failed");
                format!("generation failed: {e}")
            }
        }
    }

    /// Generate the answer incrementally.
    ///
    /// On a mid-stream failure the prior fragments stand unchanged, one
    /// final fragment carries the error message, and the stream ends. There
    /// is no retry; a caller that stops polling simply abandons the backend
    /// stream between fragments.
    pub async fn answer_stream(&self, prompt: &Prompt) -> AnswerStream {
        let llm = Arc::clone(&self.llm);
        let prompt = prompt.clone();

        Box::pin(stream! {
            let mut inner = match llm.generate_stream(&prompt).await {
                Ok(inner) => inner,
                Err(e) => {
                    error!(model = llm.name(), error = %e, "generation failed to start");
                    yield format!("generation failed: {e}");
                    return;
                }
            };

            while let Some(item) = inner.next().await {
                match item {
                    Ok(fragment) => yield fragment,
                    Err(e) => {
                        error!(model = llm.name(), error = %e, "generation failed mid-stream");
                        yield format!("generation failed: {e}");
                        return;
                    }
                }
            }
        })
    }
}

/// Drop a leading `<think>…</think>` block, returning the reply proper.
///
/// Replies without such a block pass through untouched.
pub fn strip_reasoning(text: &str) -> &str {
    static THINK_RE: OnceLock<Regex> = OnceLock::new();
    let re = THINK_RE
        .get_or_init(|| Regex::new(r"(?s)<think>.*?</think>(.*)").expect("static regex"));

    match re.captures(text).and_then(|c| c.get(1)) {
        Some(tail) => tail.as_str().trim(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use raven_model::MockLlm;

    use super::*;

    fn prompt() -> Prompt {
        Prompt::new("system", "question")
    }

    #[test]
    fn strip_reasoning_removes_think_block() {
        let text = "<think>internal\nchains</think>\n\nThe actual answer.";
        assert_eq!(strip_reasoning(text), "The actual answer.");
    }

    #[test]
    fn strip_reasoning_passes_plain_text_through() {
        assert_eq!(strip_reasoning("just an answer"), "just an answer");
    }

    #[tokio::test]
    async fn blocking_failure_becomes_text() {
        let client = GenerationClient::new(Arc::new(MockLlm::failing("backend down")));
        let answer = client.answer(&prompt()).await;
        assert!(answer.starts_with("generation failed:"));
        assert!(answer.contains("backend down"));
    }

    #[tokio::test]
    async fn mid_stream_failure_yields_final_error_fragment() {
        let client = GenerationClient::new(Arc::new(MockLlm::failing_after("0123456789", 1)));
        let mut stream = client.answer_stream(&prompt()).await;

        let mut fragments = Vec::new();
        while let Some(fragment) = stream.next().await {
            fragments.push(fragment);
        }

        assert_eq!(fragments[0], "0123");
        assert!(fragments[1].starts_with("generation failed:"));
        assert_eq!(fragments.len(), 2);
    }
}
