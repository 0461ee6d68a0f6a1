//! Embedding generation
//!
//! The manager talks to an [`EmbeddingProvider`]; [`FastEmbedProvider`] runs a
//! local ONNX model through the fastembed crate.

use async_trait::async_trait;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedderError {
    #[error("Failed to initialize embedding model: {0}")]
    InitError(String),
    #[error("Failed to generate embeddings: {0}")]
    EmbedError(String),
    #[error("Embedding task failed: {0}")]
    TaskFailed(String),
}

/// Produces embedding vectors from text
///
/// Vectors returned from one `embed_batch` call must all have the same width.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier recorded in the knowledge-base metadata
    fn model_name(&self) -> &str;

    /// Embed a batch of texts, one vector per text in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedderError::EmbedError("No embedding returned".to_string()))
    }
}

/// Local embeddings using fastembed (lazy initialization)
pub struct FastEmbedProvider {
    model: Arc<Mutex<Option<TextEmbedding>>>,
    model_kind: EmbeddingModel,
    model_name: String,
    cache_dir: Option<PathBuf>,
    batch_size: usize,
}

impl FastEmbedProvider {
    /// all-MiniLM-L6-v2, 384 dimensions
    pub fn new() -> Self {
        Self::with_model(EmbeddingModel::AllMiniLML6V2, "all-MiniLM-L6-v2")
    }

    /// Use another fastembed model; `model_name` is what gets recorded in metadata
    pub fn with_model(model_kind: EmbeddingModel, model_name: &str) -> Self {
        Self {
            model: Arc::new(Mutex::new(None)),
            model_kind,
            model_name: model_name.to_string(),
            cache_dir: None,
            batch_size: 64,
        }
    }

    /// Persist downloaded model files under `cache_dir`
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = Some(cache_dir);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Load the model, downloading it on first use
    pub fn initialize(&self) -> Result<(), EmbedderError> {
        let mut model_guard = self
            .model
            .lock()
            .map_err(|_| EmbedderError::InitError("model lock poisoned".to_string()))?;
        if model_guard.is_none() {
            *model_guard = Some(load_model(&self.model_kind, self.cache_dir.as_ref())?);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.model
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

fn load_model(
    model_kind: &EmbeddingModel,
    cache_dir: Option<&PathBuf>,
) -> Result<TextEmbedding, EmbedderError> {
    let mut options = TextInitOptions::new(model_kind.clone()).with_show_download_progress(true);
    // Persist downloaded model files between runs
    if let Some(cache_dir) = cache_dir {
        options = options.with_cache_dir(cache_dir.clone());
    }

    let model =
        TextEmbedding::try_new(options).map_err(|e| EmbedderError::InitError(e.to_string()))?;
    log::info!("Loaded embedding model {:?}", model_kind);
    Ok(model)
}

impl Default for FastEmbedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedderError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let model = Arc::clone(&self.model);
        let model_kind = self.model_kind.clone();
        let cache_dir = self.cache_dir.clone();
        let texts = texts.to_vec();
        let batch_size = self.batch_size;

        // Model download and ONNX inference both block, keep them off the async workers
        tokio::task::spawn_blocking(move || {
            let mut model_guard = model
                .lock()
                .map_err(|_| EmbedderError::EmbedError("model lock poisoned".to_string()))?;
            if model_guard.is_none() {
                *model_guard = Some(load_model(&model_kind, cache_dir.as_ref())?);
            }
            let text_model = model_guard
                .as_mut()
                .ok_or_else(|| EmbedderError::InitError("Model not initialized".to_string()))?;

            text_model
                .embed(texts, Some(batch_size))
                .map_err(|e| EmbedderError::EmbedError(e.to_string()))
        })
        .await
        .map_err(|e| EmbedderError::TaskFailed(e.to_string()))?
    }
}
