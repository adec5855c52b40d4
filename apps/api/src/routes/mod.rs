pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analytics;
use crate::candidates;
use crate::jobs;
use crate::resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resumes", post(resumes::handlers::handle_upload_resume))
        .route(
            "/api/v1/resumes/:id/download",
            get(resumes::handlers::handle_download_resume),
        )
        // Candidate API
        .route(
            "/api/v1/candidates",
            get(candidates::handlers::handle_list_candidates),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handlers::handle_get_candidate),
        )
        // Job + ranking API
        .route("/api/v1/jobs", post(jobs::handlers::handle_create_job))
        .route("/api/v1/jobs/:id/rank", post(jobs::handlers::handle_rank_job))
        .route(
            "/api/v1/jobs/:id/rankings",
            get(jobs::handlers::handle_get_rankings),
        )
        // Analytics
        .route(
            "/api/v1/analytics/top-skills",
            get(analytics::handlers::handle_top_skills),
        )
        .with_state(state)
}
