mod analytics;
mod candidates;
mod config;
mod db;
mod embedding;
mod errors;
mod extraction;
mod jobs;
mod matching;
mod models;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::embedding::{Embedder, FastEmbedder, EMBEDDING_DIM, MODEL_NAME};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screening API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize the embedding service. The model is optional: without it
    // the service still accepts uploads, with exact-match skills only and
    // no semantic scores for new documents.
    let embedder: Option<Arc<dyn Embedder>> = match FastEmbedder::load() {
        Ok(service) => {
            info!("Embedding model loaded ({MODEL_NAME}, {EMBEDDING_DIM} dims)");
            Some(Arc::new(service))
        }
        Err(e) => {
            warn!("Embedding model unavailable, running degraded: {e:#}");
            None
        }
    };

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        embedder,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
