//! Deterministic mock LLM for tests and offline development.

use async_stream::try_stream;
use async_trait::async_trait;

use raven_core::{CoreError, Llm, Prompt, Result, TokenStream};

/// A scripted [`Llm`] that returns a fixed reply.
///
/// The streaming path yields the reply in fixed-size character fragments, so
/// fragment concatenation is trivially equal to the blocking answer. Failure
/// modes can be injected for testing the error-to-text policy:
/// [`failing`](MockLlm::failing) errors immediately on both paths,
/// [`failing_after`](MockLlm::failing_after) yields a prefix of fragments and
/// then errors mid-stream.
#[derive(Debug, Clone)]
pub struct MockLlm {
    reply: String,
    fragment_size: usize,
    fail_immediately: bool,
    fail_after_fragments: Option<usize>,
}

impl MockLlm {
    /// A mock that answers every prompt with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            fragment_size: 4,
            fail_immediately: false,
            fail_after_fragments: None,
        }
    }

    /// Set how many characters each stream fragment carries.
    pub fn with_fragment_size(mut self, size: usize) -> Self {
        self.fragment_size = size.max(1);
        self
    }

    /// A mock whose calls fail outright.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: message.into(),
            fragment_size: 4,
            fail_immediately: true,
            fail_after_fragments: None,
        }
    }

    /// A mock whose stream errors after yielding `fragments` fragments.
    pub fn failing_after(reply: impl Into<String>, fragments: usize) -> Self {
        Self {
            reply: reply.into(),
            fragment_size: 4,
            fail_immediately: false,
            fail_after_fragments: Some(fragments),
        }
    }

    fn fragments(&self) -> Vec<String> {
        let chars: Vec<char> = self.reply.chars().collect();
        chars.chunks(self.fragment_size).map(|c| c.iter().collect()).collect()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _prompt: &Prompt) -> Result<String> {
        if self.fail_immediately {
            return Err(CoreError::model("mock", self.reply.clone()));
        }
        Ok(self.reply.clone())
    }

    async fn generate_stream(&self, _prompt: &Prompt) -> Result<TokenStream> {
        let fragments = self.fragments();
        let fail_immediately = self.fail_immediately;
        let fail_after = self.fail_after_fragments;
        let message = self.reply.clone();

        let stream = try_stream! {
            if fail_immediately {
                Err(CoreError::model("mock", message.clone()))?;
            }
            for (i, fragment) in fragments.into_iter().enumerate() {
                if let Some(limit) = fail_after {
                    if i >= limit {
                        Err(CoreError::model("mock", "injected mid-stream failure"))?;
                    }
                }
                yield fragment;
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    fn prompt() -> Prompt {
        Prompt::new("system", "question")
    }

    #[tokio::test]
    async fn stream_concatenates_to_blocking_answer() {
        let mock = MockLlm::new("a deterministic reply").with_fragment_size(3);
        let blocking = mock.generate(&prompt()).await.unwrap();

        let mut streamed = String::new();
        let mut stream = mock.generate_stream(&prompt()).await.unwrap();
        while let Some(fragment) = stream.next().await {
            streamed.push_str(&fragment.unwrap());
        }

        assert_eq!(streamed, blocking);
    }

    #[tokio::test]
    async fn failing_after_yields_prefix_then_error() {
        let mock = MockLlm::failing_after("0123456789ab", 2);
        let mut stream = mock.generate_stream(&prompt()).await.unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap(), "0123");
        assert_eq!(stream.next().await.unwrap().unwrap(), "4567");
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }
}
