#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub filename: String,
    pub upload_path: String,
    pub raw_text: String,
    /// Contact fields and detected skills as captured at upload time.
    pub parsed_json: Option<Value>,
    /// NULL when the embedding provider was unavailable at upload time.
    pub embedding: Option<Json<Vec<f32>>>,
    pub uploaded_at: DateTime<Utc>,
}
