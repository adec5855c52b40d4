//! Ranking runs: one full recomputation of all resume scores for a posting.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranking::{compute_final_score, RankingWeights, ScoreBreakdown};
use crate::models::candidate::ResumeRow;
use crate::models::job::JobRow;

#[derive(Debug, Serialize)]
pub struct RankingRunSummary {
    pub status: String,
    pub ranked: usize,
    pub skipped: usize,
}

/// One resume as seen by the scoring loop: its stored embedding (if any)
/// and its detected skill ids.
#[derive(Debug, Clone)]
pub struct RankingCandidate {
    pub resume_id: Uuid,
    pub embedding: Option<Vec<f32>>,
    pub skill_ids: HashSet<Uuid>,
}

/// A score row ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResume {
    pub resume_id: Uuid,
    pub breakdown: ScoreBreakdown,
}

/// Scores every candidate resume against one posting.
///
/// Pairs missing either embedding are excluded entirely, never recorded
/// as zero: a job without an embedding yields no rows at all. A shape
/// mismatch aborts only that pair; other resumes still score. Output
/// order follows input order, so identical inputs produce identical rows.
pub fn score_candidates(
    job_embedding: Option<&[f32]>,
    candidates: &[RankingCandidate],
    job_skill_ids: &HashSet<Uuid>,
    weights: RankingWeights,
) -> (Vec<ScoredResume>, usize) {
    let mut scored = Vec::new();
    let mut skipped = 0_usize;

    for candidate in candidates {
        let (Some(job_emb), Some(resume_emb)) =
            (job_embedding, candidate.embedding.as_deref())
        else {
            skipped += 1;
            continue;
        };

        match compute_final_score(job_emb, resume_emb, job_skill_ids, &candidate.skill_ids, weights)
        {
            Ok(breakdown) => scored.push(ScoredResume {
                resume_id: candidate.resume_id,
                breakdown,
            }),
            Err(e) => {
                warn!(resume_id = %candidate.resume_id, "skipping unscorable resume: {e}");
                skipped += 1;
            }
        }
    }

    (scored, skipped)
}

/// Recomputes the ranking for a posting.
///
/// Prior rows for the posting are discarded and replaced inside a single
/// transaction, so readers never observe a partially rebuilt ranking set.
pub async fn run_ranking(
    pool: &PgPool,
    job_id: Uuid,
    weights: RankingWeights,
) -> Result<RankingRunSummary, AppError> {
    let job: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    let job = job.ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let job_skill_ids: HashSet<Uuid> =
        sqlx::query_scalar("SELECT skill_id FROM job_skills WHERE job_id = $1")
            .bind(job_id)
            .fetch_all(pool)
            .await?
            .into_iter()
            .collect();

    let resumes: Vec<ResumeRow> = sqlx::query_as("SELECT * FROM resumes")
        .fetch_all(pool)
        .await?;

    let mut candidates = Vec::with_capacity(resumes.len());
    for resume in resumes {
        let skill_ids: HashSet<Uuid> =
            sqlx::query_scalar("SELECT skill_id FROM resume_skills WHERE resume_id = $1")
                .bind(resume.id)
                .fetch_all(pool)
                .await?
                .into_iter()
                .collect();
        candidates.push(RankingCandidate {
            resume_id: resume.id,
            embedding: resume.embedding.map(|e| e.0),
            skill_ids,
        });
    }

    let (scored, skipped) = score_candidates(
        job.embedding.as_ref().map(|e| e.0.as_slice()),
        &candidates,
        &job_skill_ids,
        weights,
    );

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM rankings WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

    for row in &scored {
        sqlx::query(
            r#"
            INSERT INTO rankings (job_id, resume_id, score_semantic, score_skill, final_score)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(job_id)
        .bind(row.resume_id)
        .bind(row.breakdown.score_semantic)
        .bind(row.breakdown.score_skill)
        .bind(row.breakdown.final_score)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(%job_id, ranked = scored.len(), skipped, "ranking run complete");

    Ok(RankingRunSummary {
        status: "done".to_string(),
        ranked: scored.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(embedding: Option<Vec<f32>>, skill_ids: &[Uuid]) -> RankingCandidate {
        RankingCandidate {
            resume_id: Uuid::new_v4(),
            embedding,
            skill_ids: skill_ids.iter().copied().collect(),
        }
    }

    #[test]
    fn test_missing_job_embedding_excludes_every_resume() {
        let candidates = vec![
            candidate(Some(vec![1.0, 0.0]), &[]),
            candidate(Some(vec![0.0, 1.0]), &[]),
        ];

        let (scored, skipped) =
            score_candidates(None, &candidates, &HashSet::new(), RankingWeights::default());

        assert!(scored.is_empty());
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_resume_without_embedding_is_excluded_not_zeroed() {
        let job_emb = vec![1.0, 0.0];
        let with_embedding = candidate(Some(vec![1.0, 0.0]), &[]);
        let without_embedding = candidate(None, &[]);
        let candidates = vec![with_embedding.clone(), without_embedding.clone()];

        let (scored, skipped) = score_candidates(
            Some(&job_emb),
            &candidates,
            &HashSet::new(),
            RankingWeights::default(),
        );

        assert_eq!(scored.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(scored[0].resume_id, with_embedding.resume_id);
        assert!(!scored
            .iter()
            .any(|row| row.resume_id == without_embedding.resume_id));
    }

    #[test]
    fn test_identical_inputs_produce_identical_rankings() {
        let job_emb = vec![0.4, 0.9, -0.2];
        let required: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let job_skill_ids: HashSet<Uuid> = required.iter().copied().collect();
        let candidates = vec![
            candidate(Some(vec![0.4, 0.9, -0.2]), &required[..2]),
            candidate(Some(vec![-1.0, 0.3, 0.8]), &required),
            candidate(None, &[]),
        ];

        let first = score_candidates(
            Some(&job_emb),
            &candidates,
            &job_skill_ids,
            RankingWeights::default(),
        );
        let second = score_candidates(
            Some(&job_emb),
            &candidates,
            &job_skill_ids,
            RankingWeights::default(),
        );

        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_mismatch_skips_only_that_resume() {
        let job_emb = vec![1.0, 0.0];
        let good = candidate(Some(vec![0.0, 1.0]), &[]);
        let bad = candidate(Some(vec![1.0, 0.0, 0.0]), &[]);
        let candidates = vec![bad, good.clone()];

        let (scored, skipped) = score_candidates(
            Some(&job_emb),
            &candidates,
            &HashSet::new(),
            RankingWeights::default(),
        );

        assert_eq!(scored.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(scored[0].resume_id, good.resume_id);
    }

    #[test]
    fn test_scored_rows_carry_full_breakdown() {
        let job_emb = vec![1.0, 0.0];
        let candidates = vec![candidate(Some(vec![1.0, 0.0]), &[])];

        let (scored, _) = score_candidates(
            Some(&job_emb),
            &candidates,
            &HashSet::new(),
            RankingWeights::default(),
        );

        let breakdown = &scored[0].breakdown;
        assert!((breakdown.score_semantic - 1.0).abs() < 1e-9);
        assert_eq!(breakdown.score_skill, 1.0);
        assert!((breakdown.final_score - 1.0).abs() < 1e-9);
    }
}
