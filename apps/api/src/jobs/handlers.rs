use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::ranking::{run_ranking, RankingRunSummary};
use crate::matching::ranking::RankingWeights;
use crate::models::job::JobRow;
use crate::models::skill::SkillRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobCreateRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Required skills; unseen names grow the canonical vocabulary.
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JobOut {
    pub job_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// POST /api/v1/jobs
///
/// Creates a posting, embeds its description (falling back to the title),
/// and upserts every required skill into the vocabulary. A missing
/// embedding is tolerated; such a job simply cannot be ranked yet.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<JobCreateRequest>,
) -> Result<Json<JobOut>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("job title must not be empty".to_string()));
    }

    let embed_input = req.description.as_deref().unwrap_or(&req.title);
    let embedding = match &state.embedder {
        Some(embedder) => match embedder.embed(embed_input).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!("storing job without embedding: {e}");
                None
            }
        },
        None => None,
    };

    let job: JobRow = sqlx::query_as(
        "INSERT INTO jobs (title, description, embedding) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(embedding.map(SqlJson))
    .fetch_one(&state.db)
    .await?;

    for raw_name in &req.skills {
        let name = raw_name.trim();
        if name.is_empty() {
            continue;
        }
        let skill = upsert_skill(&state, name).await?;
        sqlx::query("INSERT INTO job_skills (job_id, skill_id) VALUES ($1, $2)")
            .bind(job.id)
            .bind(skill.id)
            .execute(&state.db)
            .await?;
    }

    Ok(Json(JobOut {
        job_id: job.id,
        title: job.title,
        description: job.description,
    }))
}

/// POST /api/v1/jobs/:id/rank
pub async fn handle_rank_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RankingRunSummary>, AppError> {
    let weights = RankingWeights {
        semantic: state.config.weight_semantic,
        skill: state.config.weight_skill,
    };
    let summary = run_ranking(&state.db, id, weights).await?;
    Ok(Json(summary))
}

#[derive(Debug, Serialize, FromRow)]
pub struct RankingOut {
    pub ranking_id: Uuid,
    pub resume_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: Option<String>,
    pub score_semantic: f64,
    pub score_skill: f64,
    pub final_score: f64,
}

/// GET /api/v1/jobs/:id/rankings
pub async fn handle_get_rankings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RankingOut>>, AppError> {
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }

    let rankings: Vec<RankingOut> = sqlx::query_as(
        r#"
        SELECT r.id AS ranking_id,
               r.resume_id,
               c.id AS candidate_id,
               c.full_name AS candidate_name,
               r.score_semantic,
               r.score_skill,
               r.final_score
        FROM rankings r
        JOIN resumes res ON res.id = r.resume_id
        JOIN candidates c ON c.id = res.candidate_id
        WHERE r.job_id = $1
        ORDER BY r.final_score DESC
        "#,
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rankings))
}

/// Fetch-or-insert on the unique skill name; the display form is the
/// title-cased name, set only on first insertion.
async fn upsert_skill(state: &AppState, name: &str) -> Result<SkillRow, AppError> {
    let skill: SkillRow = sqlx::query_as(
        r#"
        INSERT INTO skills (skill_name, canonical_name)
        VALUES ($1, $2)
        ON CONFLICT (skill_name) DO UPDATE SET canonical_name = skills.canonical_name
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(title_case(name))
    .fetch_one(&state.db)
    .await?;
    Ok(skill)
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_words() {
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("sql"), "Sql");
        assert_eq!(title_case(""), "");
    }
}
