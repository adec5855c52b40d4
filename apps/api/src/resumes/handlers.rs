use std::collections::HashMap;
use std::path::Path as FilePath;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use sqlx::types::Json as SqlJson;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::matching::contacts::{parse_contacts, ContactInfo};
use crate::matching::skills::{extract_skills, SkillMatch};
use crate::models::candidate::{CandidateRow, ResumeRow};
use crate::models::skill::SkillRow;
use crate::resumes::storage::save_upload;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub resume_id: Uuid,
    pub candidate_id: Uuid,
    pub parsed: ParsedResume,
}

#[derive(Debug, Serialize)]
pub struct ParsedResume {
    #[serde(flatten)]
    pub contact: ContactInfo,
    pub skills: Vec<SkillMatch>,
}

/// POST /api/v1/resumes
///
/// Multipart upload with a single `file` field. Stores the file, extracts
/// text, parses contacts, detects skills against the stored vocabulary,
/// embeds the text, and persists everything. Embedding failures degrade to
/// a NULL embedding; the upload still succeeds.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;

    let (path, stored_name) =
        save_upload(FilePath::new(&state.config.upload_dir), &filename, &bytes).await?;

    let text = extract_text(&path).await?;
    let contact = parse_contacts(&text);

    let vocabulary: Vec<SkillRow> = sqlx::query_as("SELECT * FROM skills ORDER BY skill_name")
        .fetch_all(&state.db)
        .await?;
    let skill_names: Vec<String> = vocabulary.iter().map(|s| s.skill_name.clone()).collect();

    let matches = extract_skills(
        &text,
        &skill_names,
        state.config.similarity_threshold,
        state.embedder.as_deref(),
    )
    .await;

    let embedding = match &state.embedder {
        Some(embedder) => match embedder.embed(&text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                warn!("storing resume without embedding: {e}");
                None
            }
        },
        None => None,
    };

    let candidate = upsert_candidate(&state, &contact).await?;

    let parsed_json = json!({ "contact": &contact, "skills": &matches });
    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (candidate_id, filename, upload_path, raw_text, parsed_json, embedding)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(candidate.id)
    .bind(&stored_name)
    .bind(path.to_string_lossy().as_ref())
    .bind(&text)
    .bind(&parsed_json)
    .bind(embedding.map(SqlJson))
    .fetch_one(&state.db)
    .await?;

    link_resume_skills(&state, resume.id, &vocabulary, &matches).await?;

    info!(
        resume_id = %resume.id,
        candidate_id = %candidate.id,
        skills = matches.len(),
        has_embedding = resume.embedding.is_some(),
        "resume ingested"
    );

    Ok(Json(ResumeUploadResponse {
        resume_id: resume.id,
        candidate_id: candidate.id,
        parsed: ParsedResume { contact, skills: matches },
    }))
}

/// GET /api/v1/resumes/:id/download
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let resume: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let resume = resume.ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let bytes = tokio::fs::read(&resume.upload_path)
        .await
        .map_err(|e| AppError::Storage(format!("failed to read stored file: {e}")))?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", resume.filename),
        ),
    ];
    Ok((headers, bytes).into_response())
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .unwrap_or("upload")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(AppError::Validation(
        "missing multipart field 'file'".to_string(),
    ))
}

/// Reuses an existing candidate when the parsed email is already known,
/// otherwise creates one from whatever contact fields were found.
async fn upsert_candidate(
    state: &AppState,
    contact: &ContactInfo,
) -> Result<CandidateRow, AppError> {
    if let Some(email) = &contact.email {
        let existing: Option<CandidateRow> =
            sqlx::query_as("SELECT * FROM candidates WHERE email = $1")
                .bind(email)
                .fetch_optional(&state.db)
                .await?;
        if let Some(candidate) = existing {
            return Ok(candidate);
        }
    }

    let candidate: CandidateRow = sqlx::query_as(
        "INSERT INTO candidates (full_name, email, phone) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .fetch_one(&state.db)
    .await?;
    Ok(candidate)
}

async fn link_resume_skills(
    state: &AppState,
    resume_id: Uuid,
    vocabulary: &[SkillRow],
    matches: &[SkillMatch],
) -> Result<(), AppError> {
    let ids_by_name: HashMap<&str, Uuid> = vocabulary
        .iter()
        .map(|s| (s.skill_name.as_str(), s.id))
        .collect();

    for m in matches {
        let Some(&skill_id) = ids_by_name.get(m.skill.as_str()) else {
            continue;
        };
        sqlx::query("INSERT INTO resume_skills (resume_id, skill_id, confidence) VALUES ($1, $2, $3)")
            .bind(resume_id)
            .bind(skill_id)
            .bind(m.confidence)
            .execute(&state.db)
            .await?;
    }
    Ok(())
}
