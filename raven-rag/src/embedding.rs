//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. The model identity is pinned at construction: the same text
/// always maps to the same vector for the lifetime of a provider, which is
/// what makes a persisted index reusable across runs.
///
/// The default [`embed`](EmbeddingProvider::embed) implementation delegates
/// to [`embed_batch`](EmbeddingProvider::embed_batch) with a single input.
///
/// # Example
///
/// ```rust,ignore
/// use raven_rag::embedding::EmbeddingProvider;
///
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut results = self.embed_batch(&[text]).await?;
        results.pop().ok_or_else(|| crate::error::RagError::EmbeddingError {
            provider: self.model_id().to_string(),
            message: "backend returned no embedding".to_string(),
        })
    }

    /// Generate embedding vectors for a batch of text inputs, in order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// The identifier of the underlying model, recorded in persisted indexes.
    fn model_id(&self) -> &str;
}
