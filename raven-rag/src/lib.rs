//! # raven-rag
//!
//! Document ingestion, embedding, and vector retrieval for Raven.
//!
//! ## Overview
//!
//! The crate implements the retrieval half of the chat system:
//!
//! - [`DocumentLoader`] — loads PDFs (page per document) and text files
//! - [`RecursiveChunker`] — boundary-preferring splitting with overlap
//! - [`EmbeddingProvider`] — embedding trait, with [`FastembedProvider`]
//!   (local ONNX model) and [`HashEmbeddingProvider`] (deterministic,
//!   offline) implementations
//! - [`VectorStore`] — store trait, with [`InMemoryVectorStore`] and the
//!   snapshot-persisted [`SnapshotVectorStore`]
//! - [`RagPipeline`] — build-or-load index lifecycle plus similarity search
//! - [`Retriever`] — question-level retrieval and context formatting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use raven_rag::{
//!     DocumentLoader, FastembedProvider, RagConfig, RagPipeline, RecursiveChunker, Retriever,
//!     SnapshotVectorStore,
//! };
//!
//! let config = RagConfig::default();
//! let provider = Arc::new(FastembedProvider::new(&config.embedding_model)?);
//! let store = Arc::new(SnapshotVectorStore::new(&config.persist_dir));
//! let chunker = Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap));
//!
//! let pipeline = Arc::new(
//!     RagPipeline::builder()
//!         .config(config.clone())
//!         .embedding_provider(provider)
//!         .store(store)
//!         .chunker(chunker)
//!         .build()?,
//! );
//!
//! let documents = DocumentLoader::new(&config.docs_dir).load()?;
//! pipeline.build_index(&documents, false).await?;
//!
//! let retriever = Retriever::new(pipeline);
//! let results = retriever.retrieve("what's your favorite day of the year?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod fastembed;
pub mod hash;
pub mod inmemory;
pub mod loader;
pub mod persist;
pub mod pipeline;
pub mod retriever;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use fastembed::FastembedProvider;
pub use hash::HashEmbeddingProvider;
pub use inmemory::InMemoryVectorStore;
pub use loader::DocumentLoader;
pub use persist::SnapshotVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
