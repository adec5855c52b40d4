use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::embedding::Embedder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Embedding service, injected at startup. `None` when the model failed
    /// to load: skill matching then runs exact-match-only and new resumes
    /// and jobs are stored without embeddings.
    pub embedder: Option<Arc<dyn Embedder>>,
}
