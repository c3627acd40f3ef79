//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with similarity search.
///
/// Implementations manage named collections of embedded [`Chunk`]s. Stores
/// must be safe for concurrent read access once populated; writes replace a
/// collection wholesale rather than mutating entries in place.
///
/// # Example
///
/// ```rust,ignore
/// use raven_rag::{inmemory::InMemoryVectorStore, vectorstore::VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("scripts", 384).await?;
/// store.upsert("scripts", &chunks).await?;
/// let results = store.search("scripts", &query_embedding, 2).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its data.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Insert chunks into a collection, replacing entries with matching IDs.
    /// Chunks must have embeddings set.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Number of entries in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;

    /// Search for the `top_k` entries most similar to the given embedding.
    ///
    /// Returns results ordered by descending similarity score, ties broken
    /// by insertion order. When the collection holds fewer than `top_k`
    /// entries, all of them are returned.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
