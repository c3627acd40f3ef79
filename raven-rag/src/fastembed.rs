//! Local embedding provider backed by the `fastembed` ONNX runtime.
//!
//! The model is loaded once at construction (the expensive, one-time cost)
//! and reused for every call. Construction fails fatally on an unsupported
//! model name or a failed weight load, so a broken embedding setup surfaces
//! before any query traffic is accepted.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// An [`EmbeddingProvider`] running a pinned sentence-embedding model
/// in-process via [fastembed](https://docs.rs/fastembed).
///
/// Inference takes exclusive access to the model, so it sits behind a
/// `Mutex`, and calls are dispatched through `spawn_blocking` to keep the
/// async executor responsive during batch embedding.
///
/// # Example
///
/// ```rust,ignore
/// use raven_rag::fastembed::FastembedProvider;
///
/// let provider = FastembedProvider::new("intfloat/multilingual-e5-large")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct FastembedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_id: String,
    dimensions: usize,
}

impl FastembedProvider {
    /// Load the named model. Fails if the name is unsupported or the weights
    /// cannot be fetched/loaded.
    pub fn new(model_id: &str) -> Result<Self> {
        let (model, dimensions) = resolve_model(model_id)?;

        let embedding = TextEmbedding::try_new(
            InitOptions::new(model).with_show_download_progress(false),
        )
        .map_err(|e| RagError::EmbeddingError {
            provider: model_id.to_string(),
            message: format!("failed to load model: {e}"),
        })?;

        info!(model = model_id, dimensions, "embedding model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_id: model_id.to_string(),
            dimensions,
        })
    }
}

/// Map a configured model identifier to a fastembed model and its dimension.
fn resolve_model(model_id: &str) -> Result<(EmbeddingModel, usize)> {
    match model_id {
        "intfloat/multilingual-e5-large" => Ok((EmbeddingModel::MultilingualE5Large, 1024)),
        "intfloat/multilingual-e5-base" => Ok((EmbeddingModel::MultilingualE5Base, 768)),
        "intfloat/multilingual-e5-small" => Ok((EmbeddingModel::MultilingualE5Small, 384)),
        "sentence-transformers/all-MiniLM-L6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "BAAI/bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        "BAAI/bge-base-en-v1.5" => Ok((EmbeddingModel::BGEBaseENV15, 768)),
        other => Err(RagError::EmbeddingError {
            provider: other.to_string(),
            message: "unsupported embedding model name".to_string(),
        }),
    }
}

#[async_trait]
impl EmbeddingProvider for FastembedProvider {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let model = Arc::clone(&self.model);
        let model_id = self.model_id.clone();

        tokio::task::spawn_blocking(move || {
            let mut guard = model.lock().map_err(|_| RagError::EmbeddingError {
                provider: model_id.clone(),
                message: "embedding model mutex poisoned".to_string(),
            })?;
            guard.embed(owned, None).map_err(|e| RagError::EmbeddingError {
                provider: model_id.clone(),
                message: format!("inference failed: {e}"),
            })
        })
        .await
        .map_err(|e| RagError::EmbeddingError {
            provider: self.model_id.clone(),
            message: format!("embedding task panicked: {e}"),
        })?
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_model_name_is_rejected() {
        let err = resolve_model("definitely/not-a-model").unwrap_err();
        assert!(matches!(err, RagError::EmbeddingError { .. }));
    }

    #[test]
    fn known_models_resolve_with_dimensions() {
        let (_, dims) = resolve_model("intfloat/multilingual-e5-large").unwrap();
        assert_eq!(dims, 1024);
        let (_, dims) = resolve_model("sentence-transformers/all-MiniLM-L6-v2").unwrap();
        assert_eq!(dims, 384);
    }
}
