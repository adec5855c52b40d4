use anyhow::{Context, Result};

use crate::matching::ranking::RankingWeights;
use crate::matching::skills::DEFAULT_SIMILARITY_THRESHOLD;

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_dir: String,
    pub port: u16,
    pub rust_log: String,
    /// Minimum raw cosine similarity for a semantic skill hit.
    pub similarity_threshold: f32,
    pub weight_semantic: f64,
    pub weight_skill: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            similarity_threshold: parse_env("SIMILARITY_THRESHOLD", DEFAULT_SIMILARITY_THRESHOLD)?,
            weight_semantic: parse_env("WEIGHT_SEMANTIC", RankingWeights::default().semantic)?,
            weight_skill: parse_env("WEIGHT_SKILL", RankingWeights::default().skill)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
