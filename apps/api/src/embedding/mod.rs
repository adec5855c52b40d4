//! Text embedding service.
//!
//! Wraps a local sentence-embedding model (FastEmbed, ONNX-based) behind the
//! `Embedder` capability trait. The service is constructed explicitly at
//! startup and carried in `AppState` as `Arc<dyn Embedder>`; there is no
//! global singleton. If the model cannot be loaded the service runs without
//! an embedder and every consumer degrades to its lexical-only path.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::errors::AppError;

/// Embedding model used for resumes, job descriptions, and skill names
/// (all-MiniLM-L6-v2 — 384 dimensions, good balance of speed/quality).
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Embedding dimension for the default model.
pub const EMBEDDING_DIM: usize = 384;

/// Capability interface for turning text into dense vectors.
///
/// Contract: dimensionality is constant for the process lifetime, and
/// embedding the same text twice yields the same vector (no randomness).
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError>;
}

/// FastEmbed-backed `Embedder`.
///
/// Model inference is CPU-bound, so calls are dispatched to the blocking
/// thread pool. The loaded model is safe for concurrent read-only use.
pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
}

impl FastEmbedder {
    /// Loads the embedding model. Downloads model weights into the local
    /// cache on first use, which can take a while.
    pub fn load() -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .context("failed to load sentence-embedding model")?;

        Ok(Self {
            model: Arc::new(model),
        })
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        let model = Arc::clone(&self.model);
        tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| AppError::Embedding(format!("embedding task panicked: {e}")))?
            .map_err(|e| AppError::Embedding(e.to_string()))
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let mut vectors = self.run(vec![text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| AppError::Embedding("model returned no vector".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run(texts.to_vec()).await
    }
}
