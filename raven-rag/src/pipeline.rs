//! Ingestion and query pipeline.
//!
//! The [`RagPipeline`] coordinates the build-once, query-many workflow:
//! documents are chunked, embedded, swapped into the vector store as one
//! unit, and persisted; queries embed the question with the same provider
//! and search the store.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use raven_rag::{RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(provider))
//!     .store(Arc::new(store))
//!     .chunker(Arc::new(chunker))
//!     .build()?;
//!
//! let count = pipeline.build_index(&documents, false).await?;
//! let results = pipeline.query("what's your favorite day?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::persist::SnapshotVectorStore;

/// How many chunk texts are embedded per provider call during a build.
const EMBED_BATCH: usize = 64;

/// The ingestion and retrieval pipeline.
///
/// Owns one embedding provider, one snapshot-backed vector store, and one
/// chunker; all are shared read-only by concurrent queries once the index is
/// built or loaded. Construct via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    store: Arc<SnapshotVectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Whether a persisted snapshot exists for the configured collection.
    pub fn index_exists(&self) -> bool {
        self.store.exists(&self.config.collection)
    }

    /// Number of entries currently live in the configured collection.
    pub async fn index_len(&self) -> Result<usize> {
        use crate::vectorstore::VectorStore as _;
        self.store.count(&self.config.collection).await
    }

    /// Load the persisted index for the configured collection into memory.
    ///
    /// Validates the snapshot header against the configured embedding
    /// provider. Returns the number of entries loaded.
    pub async fn load_index(&self) -> Result<usize> {
        self.store
            .load_collection(
                &self.config.collection,
                self.embedding_provider.model_id(),
                self.embedding_provider.dimensions(),
            )
            .await
    }

    /// Build the index from documents, or load the persisted one.
    ///
    /// With `force_recreate == false` and an existing snapshot, this is a
    /// load, not a rebuild; calling it twice performs no new index write.
    /// With `force_recreate == true` the index is rebuilt unconditionally
    /// and the snapshot replaced atomically.
    ///
    /// Returns the number of index entries.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NoDocuments`] when a build is required but
    /// `documents` produced no chunks.
    pub async fn build_index(&self, documents: &[Document], force_recreate: bool) -> Result<usize> {
        if self.index_exists() && !force_recreate {
            info!(collection = %self.config.collection, "persisted index found, loading instead of rebuilding");
            return self.load_index().await;
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        for document in documents {
            chunks.extend(self.chunker.chunk(document));
        }
        if chunks.is_empty() {
            return Err(RagError::NoDocuments { dir: self.config.docs_dir.clone() });
        }

        info!(
            collection = %self.config.collection,
            documents = documents.len(),
            chunks = chunks.len(),
            "building index"
        );

        for batch in chunks.chunks_mut(EMBED_BATCH) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
            let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
                error!(error = %e, "embedding failed during index build");
                e
            })?;
            for (chunk, embedding) in batch.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }
        }

        let count = chunks.len();
        // Publish the new entries in one swap, then persist; queries racing
        // the rebuild keep seeing the previous complete set.
        self.store.replace_collection(&self.config.collection, chunks).await;
        self.store
            .persist(
                &self.config.collection,
                self.embedding_provider.model_id(),
                self.embedding_provider.dimensions(),
            )
            .await?;

        Ok(count)
    }

    /// Search the index with the configured `top_k`.
    pub async fn query(&self, question: &str) -> Result<Vec<SearchResult>> {
        self.search(question, self.config.top_k).await
    }

    /// Search the index for the `top_k` chunks most similar to `question`.
    ///
    /// The question is embedded with the same provider the index was built
    /// with. Returns at most `top_k` results, fewer when the index is
    /// smaller, ordered by descending similarity.
    pub async fn search(&self, question: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        use crate::vectorstore::VectorStore as _;

        let query_embedding = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            e
        })?;

        let results =
            self.store.search(&self.config.collection, &query_embedding, top_k).await.map_err(
                |e| {
                    error!(collection = %self.config.collection, error = %e, "vector search failed");
                    e
                },
            )?;

        info!(result_count = results.len(), "query completed");
        Ok(results)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. Call [`build()`](RagPipelineBuilder::build) to
/// validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<SnapshotVectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the snapshot-backed vector store.
    pub fn store(mut self, store: Arc<SnapshotVectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let store =
            self.store.ok_or_else(|| RagError::ConfigError("store is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::ConfigError("chunker is required".to_string()))?;

        Ok(RagPipeline { config, embedding_provider, store, chunker })
    }
}
