//! Deterministic hash-based embedding provider.
//!
//! Maps text to a fixed vector derived from its SHA-256 digest: the same
//! text always produces the same vector, distinct texts almost always
//! differ. Useful for offline development and tests where downloading a
//! real model is unwanted; the vectors carry no semantic meaning.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// An [`EmbeddingProvider`] producing deterministic pseudo-embeddings.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    /// Create a provider emitting vectors of the given dimension.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for HashEmbeddingProvider {
    fn default() -> Self {
        Self::new(32)
    }
}

/// Derive a unit-norm vector from the SHA-256 digest of `text`.
fn hash_embed(text: &str, dimensions: usize) -> Vec<f32> {
    let digest = Sha256::digest(text.as_bytes());
    let mut v: Vec<f32> = (0..dimensions)
        .map(|i| {
            let byte = digest[i % digest.len()] as f32;
            // Rotate by position so dimensions beyond 32 are not pure repeats.
            let scale = ((i / digest.len()) + 1) as f32;
            (byte / 255.0) * 2.0 - 1.0 / scale
        })
        .collect();
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| hash_embed(t, self.dimensions)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        "hash-embed"
    }
}
