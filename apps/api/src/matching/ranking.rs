//! Final score aggregation for (job, resume) pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::similarity::cosine_scaled;

/// Weights for the linear combination of the two sub-scores. Applied as
/// given: the engine does not force them to sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankingWeights {
    pub semantic: f64,
    pub skill: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            semantic: 0.7,
            skill: 0.3,
        }
    }
}

/// Sub-scores and the final weighted score, all in [0, 1]. Transient:
/// recomputed from scratch on every ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score_semantic: f64,
    pub score_skill: f64,
    pub final_score: f64,
}

/// Combines semantic similarity and required-skill overlap into one score.
///
/// Callers must only invoke this with both embeddings present; a pair
/// missing either embedding is not scorable and must be skipped, never
/// recorded as zero. A job with no required skills trivially satisfies
/// the skill sub-score.
pub fn compute_final_score(
    job_embedding: &[f32],
    resume_embedding: &[f32],
    job_skill_ids: &HashSet<Uuid>,
    resume_skill_ids: &HashSet<Uuid>,
    weights: RankingWeights,
) -> Result<ScoreBreakdown, AppError> {
    let score_semantic = cosine_scaled(job_embedding, resume_embedding)?;

    let score_skill = if job_skill_ids.is_empty() {
        1.0
    } else {
        let matched = job_skill_ids.intersection(resume_skill_ids).count();
        matched as f64 / job_skill_ids.len() as f64
    };

    let final_score = weights.semantic * score_semantic + weights.skill * score_skill;

    Ok(ScoreBreakdown {
        score_semantic,
        score_skill,
        final_score,
    })
}
