//! Error types for the `raven-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation or model loading.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// No source documents were found where the configuration points.
    #[error("no documents found in '{}'", dir.display())]
    NoDocuments {
        /// The documents directory that was scanned.
        dir: PathBuf,
    },

    /// No persisted index exists at the given location.
    #[error("no persisted index at '{}'", path.display())]
    IndexNotFound {
        /// The snapshot path that was checked.
        path: PathBuf,
    },

    /// A persisted index exists but cannot be used.
    #[error("invalid index at '{}': {message}", path.display())]
    InvalidIndex {
        /// The snapshot path that failed validation.
        path: PathBuf,
        /// Why the snapshot was rejected.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the ingestion/query pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
