use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TopSkillsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize, FromRow)]
pub struct TopSkillOut {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub matches: i64,
}

/// GET /api/v1/analytics/top-skills
///
/// Most frequently detected skills across all uploaded resumes.
pub async fn handle_top_skills(
    State(state): State<AppState>,
    Query(query): Query<TopSkillsQuery>,
) -> Result<Json<Vec<TopSkillOut>>, AppError> {
    let rows: Vec<TopSkillOut> = sqlx::query_as(
        r#"
        SELECT s.id AS skill_id, s.skill_name, COUNT(rs.id) AS matches
        FROM skills s
        JOIN resume_skills rs ON rs.skill_id = s.id
        GROUP BY s.id, s.skill_name
        ORDER BY COUNT(rs.id) DESC
        LIMIT $1
        "#,
    )
    .bind(query.limit.clamp(1, 100))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}
