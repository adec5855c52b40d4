use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, ResumeRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct CandidateOut {
    pub candidate_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<CandidateRow> for CandidateOut {
    fn from(row: CandidateRow) -> Self {
        Self {
            candidate_id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
        }
    }
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<CandidateOut>>, AppError> {
    let rows: Vec<CandidateRow> =
        sqlx::query_as("SELECT * FROM candidates ORDER BY created_at DESC LIMIT $1 OFFSET $2")
            .bind(page.limit.clamp(1, 100))
            .bind(page.offset.max(0))
            .fetch_all(&state.db)
            .await?;

    Ok(Json(rows.into_iter().map(CandidateOut::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct ResumeSummary {
    pub resume_id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub parsed_json: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CandidateDetailResponse {
    pub candidate: CandidateOut,
    pub resumes: Vec<ResumeSummary>,
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateDetailResponse>, AppError> {
    let candidate: Option<CandidateRow> = sqlx::query_as("SELECT * FROM candidates WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let candidate =
        candidate.ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;

    let resumes: Vec<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE candidate_id = $1 ORDER BY uploaded_at DESC")
            .bind(id)
            .fetch_all(&state.db)
            .await?;

    Ok(Json(CandidateDetailResponse {
        candidate: candidate.into(),
        resumes: resumes
            .into_iter()
            .map(|r| ResumeSummary {
                resume_id: r.id,
                filename: r.filename,
                uploaded_at: r.uploaded_at,
                parsed_json: r.parsed_json,
            })
            .collect(),
    }))
}
