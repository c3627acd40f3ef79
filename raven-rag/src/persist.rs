//! Snapshot-persisted vector store.
//!
//! [`SnapshotVectorStore`] layers durability over [`InMemoryVectorStore`]:
//! each collection serializes to a single JSON snapshot file under a
//! configured directory, written to a temporary sibling and atomically
//! renamed into place, so a crash mid-write never leaves a torn index and
//! readers of the file never observe a partial one.
//!
//! The snapshot header records the embedding model identity and dimension
//! used at build time. On load, a dimension mismatch against the configured
//! provider is rejected outright; a differing model identifier with a
//! matching dimension is accepted with a warning, since similarity scores
//! may be degraded but the index is still structurally usable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::inmemory::InMemoryVectorStore;
use crate::vectorstore::VectorStore;

/// Snapshot format version, bumped on incompatible layout changes.
const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of one collection.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    model_id: String,
    dimensions: usize,
    entries: Vec<Chunk>,
}

/// A [`VectorStore`] that mirrors every collection to a JSON snapshot file.
///
/// Search and upsert operate on the in-memory mirror; [`persist`] and
/// [`load_collection`] move state to and from disk explicitly, which keeps
/// the expensive serialization out of the query path.
///
/// [`persist`]: SnapshotVectorStore::persist
/// [`load_collection`]: SnapshotVectorStore::load_collection
pub struct SnapshotVectorStore {
    inner: InMemoryVectorStore,
    dir: PathBuf,
}

impl SnapshotVectorStore {
    /// Create a store persisting snapshots under `dir`. The directory is
    /// created on the first persist, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { inner: InMemoryVectorStore::new(), dir: dir.into() }
    }

    /// Path of the snapshot file for a collection.
    pub fn snapshot_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    /// Whether a persisted snapshot exists for the collection.
    pub fn exists(&self, collection: &str) -> bool {
        self.snapshot_path(collection).is_file()
    }

    /// Replace the in-memory collection wholesale (see
    /// [`InMemoryVectorStore::replace_collection`]). Does not persist.
    pub async fn replace_collection(&self, collection: &str, entries: Vec<Chunk>) {
        self.inner.replace_collection(collection, entries).await;
    }

    /// Load a persisted collection into memory, validating the header
    /// against the embedding setup that will be used for queries.
    ///
    /// Returns the number of entries loaded.
    pub async fn load_collection(
        &self,
        collection: &str,
        expected_model_id: &str,
        expected_dimensions: usize,
    ) -> Result<usize> {
        let path = self.snapshot_path(collection);
        if !path.is_file() {
            return Err(RagError::IndexNotFound { path });
        }

        let bytes = tokio::fs::read(&path).await.map_err(|e| RagError::InvalidIndex {
            path: path.clone(),
            message: format!("read failed: {e}"),
        })?;
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| RagError::InvalidIndex {
                path: path.clone(),
                message: format!("parse failed: {e}"),
            })?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RagError::InvalidIndex {
                path,
                message: format!(
                    "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                    snapshot.version
                ),
            });
        }
        if snapshot.dimensions != expected_dimensions {
            return Err(RagError::InvalidIndex {
                path,
                message: format!(
                    "index was built with {}-dimensional embeddings, provider produces {}",
                    snapshot.dimensions, expected_dimensions
                ),
            });
        }
        if let Some(entry) = snapshot.entries.iter().find(|e| e.embedding.len() != snapshot.dimensions)
        {
            return Err(RagError::InvalidIndex {
                path,
                message: format!(
                    "entry '{}' has embedding length {} (header says {})",
                    entry.id,
                    entry.embedding.len(),
                    snapshot.dimensions
                ),
            });
        }
        if snapshot.model_id != expected_model_id {
            warn!(
                persisted = %snapshot.model_id,
                configured = %expected_model_id,
                "index was built with a different embedding model; similarity scores may be degraded"
            );
        }

        let count = snapshot.entries.len();
        self.inner.replace_collection(collection, snapshot.entries).await;
        info!(collection, count, path = %path.display(), "loaded persisted index");
        Ok(count)
    }

    /// Write the in-memory collection to its snapshot file atomically.
    pub async fn persist(
        &self,
        collection: &str,
        model_id: &str,
        dimensions: usize,
    ) -> Result<()> {
        let entries = self.inner.export(collection).await?;
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            model_id: model_id.to_string(),
            dimensions,
            entries,
        };

        let path = self.snapshot_path(collection);
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| store_err(&self.dir, e))?;

        let bytes = serde_json::to_vec(&snapshot).map_err(|e| RagError::VectorStoreError {
            backend: "snapshot".to_string(),
            message: format!("serialize failed: {e}"),
        })?;

        // Temp-then-rename keeps the published snapshot whole at all times.
        let tmp = self.dir.join(format!(".{collection}.json.tmp"));
        tokio::fs::write(&tmp, &bytes).await.map_err(|e| store_err(&tmp, e))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| store_err(&path, e))?;

        info!(collection, count = snapshot.entries.len(), path = %path.display(), "persisted index");
        Ok(())
    }

}

fn store_err(path: &Path, e: std::io::Error) -> RagError {
    RagError::VectorStoreError {
        backend: "snapshot".to_string(),
        message: format!("{}: {e}", path.display()),
    }
}

#[async_trait]
impl VectorStore for SnapshotVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        self.inner.create_collection(name, dimensions).await
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        self.inner.delete_collection(name).await
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        self.inner.upsert(collection, chunks).await
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        self.inner.count(collection).await
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        self.inner.search(collection, embedding, top_k).await
    }
}
