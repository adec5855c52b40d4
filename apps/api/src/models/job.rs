#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// NULL when the embedding provider was unavailable at creation time.
    pub embedding: Option<Json<Vec<f32>>>,
    pub created_at: DateTime<Utc>,
}
