//! Canonical skill detection.
//!
//! Two independent producers emit provenance-tagged detections: an exact
//! lexical pass and an embedding-similarity pass. A single deterministic
//! max-reduce merge resolves duplicates, so a skill never appears twice
//! and the strongest signal wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::matching::similarity::cosine;

/// Confidence assigned to an exact substring hit.
pub const EXACT_MATCH_CONFIDENCE: f64 = 0.9;

/// Default minimum raw cosine similarity for a semantic hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.72;

/// A detected skill with a confidence in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub confidence: f64,
}

/// One detection from a single producer, tagged with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillDetection {
    Exact { skill: String, confidence: f64 },
    Semantic { skill: String, similarity: f64 },
}

impl SkillDetection {
    fn skill(&self) -> &str {
        match self {
            SkillDetection::Exact { skill, .. } => skill,
            SkillDetection::Semantic { skill, .. } => skill,
        }
    }

    fn confidence(&self) -> f64 {
        match self {
            SkillDetection::Exact { confidence, .. } => *confidence,
            SkillDetection::Semantic { similarity, .. } => *similarity,
        }
    }
}

/// Case-insensitive substring containment of each canonical skill.
pub fn exact_match_pass(text: &str, vocabulary: &[String]) -> Vec<SkillDetection> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|skill| !skill.is_empty() && haystack.contains(&skill.to_lowercase()))
        .map(|skill| SkillDetection::Exact {
            skill: skill.clone(),
            confidence: EXACT_MATCH_CONFIDENCE,
        })
        .collect()
}

/// Embeds the document once and every skill name batched, then keeps the
/// skills whose raw cosine similarity reaches the threshold. The similarity
/// value itself becomes the confidence.
pub async fn semantic_pass(
    embedder: &dyn Embedder,
    text: &str,
    vocabulary: &[String],
    threshold: f32,
) -> Result<Vec<SkillDetection>, AppError> {
    if vocabulary.is_empty() {
        return Ok(Vec::new());
    }

    let document = embedder.embed(text).await?;
    let skill_vectors = embedder.embed_batch(vocabulary).await?;

    let mut detections = Vec::new();
    for (skill, vector) in vocabulary.iter().zip(skill_vectors.iter()) {
        let similarity = cosine(&document, vector)?;
        if similarity >= f64::from(threshold) {
            detections.push(SkillDetection::Semantic {
                skill: skill.clone(),
                similarity,
            });
        }
    }
    Ok(detections)
}

/// Max-reduce merge: duplicate skills across producers collapse to their
/// highest confidence, clamped to [0, 1]. Output is sorted by skill name
/// so identical inputs always produce identical results.
pub fn merge_detections(detections: Vec<SkillDetection>) -> Vec<SkillMatch> {
    let mut merged: HashMap<String, f64> = HashMap::new();
    for detection in detections {
        let confidence = detection.confidence().clamp(0.0, 1.0);
        let entry = merged.entry(detection.skill().to_string()).or_insert(0.0);
        if confidence > *entry {
            *entry = confidence;
        }
    }

    let mut matches: Vec<SkillMatch> = merged
        .into_iter()
        .map(|(skill, confidence)| SkillMatch { skill, confidence })
        .collect();
    matches.sort_by(|a, b| a.skill.cmp(&b.skill));
    matches
}

/// Detects which canonical skills appear in a document.
///
/// The semantic pass only runs when an embedder is available, and its
/// failure degrades silently to exact-match-only results.
pub async fn extract_skills(
    text: &str,
    vocabulary: &[String],
    threshold: f32,
    embedder: Option<&dyn Embedder>,
) -> Vec<SkillMatch> {
    let mut detections = exact_match_pass(text, vocabulary);

    if let Some(embedder) = embedder {
        match semantic_pass(embedder, text, vocabulary, threshold).await {
            Ok(mut semantic) => detections.append(&mut semantic),
            Err(e) => warn!("semantic skill pass unavailable, keeping exact matches only: {e}"),
        }
    }

    merge_detections(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic embedder: returns a fixed vector per known text and
    /// errors on anything else.
    struct StubEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    impl StubEmbedder {
        fn new(entries: &[(&str, Vec<f32>)]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| AppError::Embedding(format!("no stub vector for '{text}'")))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }
    }

    fn vocab(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_exact_matches_without_embedder() {
        let matches = extract_skills(
            "Python, SQL experience",
            &vocab(&["Python", "SQL", "Java"]),
            DEFAULT_SIMILARITY_THRESHOLD,
            None,
        )
        .await;

        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|m| m.confidence >= EXACT_MATCH_CONFIDENCE));
        assert!(matches.iter().any(|m| m.skill == "Python"));
        assert!(matches.iter().any(|m| m.skill == "SQL"));
        assert!(!matches.iter().any(|m| m.skill == "Java"));
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let detections = exact_match_pass("worked with POSTGRESQL daily", &vocab(&["PostgreSQL"]));
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn test_empty_vocabulary_yields_empty_result() {
        assert!(exact_match_pass("any text", &[]).is_empty());
    }

    #[tokio::test]
    async fn test_semantic_hit_uses_similarity_as_confidence() {
        let doc = vec![1.0, 0.0];
        // Similarity against doc: ~0.8 (above threshold).
        let close = vec![0.8, 0.6];
        let embedder = StubEmbedder::new(&[("resume text", doc), ("Kubernetes", close)]);

        let detections = semantic_pass(&embedder, "resume text", &vocab(&["Kubernetes"]), 0.72)
            .await
            .unwrap();

        assert_eq!(detections.len(), 1);
        match &detections[0] {
            SkillDetection::Semantic { skill, similarity } => {
                assert_eq!(skill, "Kubernetes");
                assert!((similarity - 0.8).abs() < 1e-6);
            }
            other => panic!("expected semantic detection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_semantic_miss_below_threshold() {
        let doc = vec![1.0, 0.0];
        let far = vec![0.0, 1.0]; // orthogonal, similarity ~0
        let embedder = StubEmbedder::new(&[("resume text", doc), ("Sculpting", far)]);

        let detections = semantic_pass(&embedder, "resume text", &vocab(&["Sculpting"]), 0.72)
            .await
            .unwrap();
        assert!(detections.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_detections_merge_to_max_confidence() {
        // "Rust" fires on both passes: exact (0.9) and semantic (~0.98).
        let doc = vec![1.0, 0.1];
        let near = vec![1.0, 0.0];
        let embedder = StubEmbedder::new(&[("Rust all day", doc), ("Rust", near)]);

        let matches = extract_skills("Rust all day", &vocab(&["Rust"]), 0.72, Some(&embedder)).await;

        assert_eq!(matches.len(), 1);
        assert!(matches[0].confidence > EXACT_MATCH_CONFIDENCE);
        assert!(matches[0].confidence <= 1.0);
    }

    #[tokio::test]
    async fn test_exact_confidence_wins_over_weaker_semantic_hit() {
        // Semantic similarity ~0.8 is above threshold but below the exact floor.
        let doc = vec![1.0, 0.0];
        let close = vec![0.8, 0.6];
        let embedder = StubEmbedder::new(&[("Go services", doc), ("Go", close)]);

        let matches = extract_skills("Go services", &vocab(&["Go"]), 0.72, Some(&embedder)).await;

        assert_eq!(matches.len(), 1);
        assert!((matches[0].confidence - EXACT_MATCH_CONFIDENCE).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_embedder_failure_degrades_to_exact_only() {
        // Stub has no vector for the document text, so the semantic pass errors.
        let embedder = StubEmbedder::new(&[]);

        let matches = extract_skills(
            "Python, SQL experience",
            &vocab(&["Python", "SQL", "Java"]),
            0.72,
            Some(&embedder),
        )
        .await;

        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|m| (m.confidence - EXACT_MATCH_CONFIDENCE).abs() < 1e-9));
    }

    #[tokio::test]
    async fn test_confidences_stay_within_unit_interval() {
        let doc = vec![1.0, 0.0];
        let identical = vec![1.0, 0.0];
        let embedder = StubEmbedder::new(&[("text mentioning Rust", doc), ("Rust", identical)]);

        let matches =
            extract_skills("text mentioning Rust", &vocab(&["Rust"]), 0.5, Some(&embedder)).await;

        for m in &matches {
            assert!((0.0..=1.0).contains(&m.confidence), "{m:?}");
        }
    }

    #[test]
    fn test_merge_output_is_sorted_and_deduplicated() {
        let detections = vec![
            SkillDetection::Semantic {
                skill: "SQL".to_string(),
                similarity: 0.75,
            },
            SkillDetection::Exact {
                skill: "Python".to_string(),
                confidence: EXACT_MATCH_CONFIDENCE,
            },
            SkillDetection::Exact {
                skill: "SQL".to_string(),
                confidence: EXACT_MATCH_CONFIDENCE,
            },
        ];

        let matches = merge_detections(detections);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].skill, "Python");
        assert_eq!(matches[1].skill, "SQL");
        assert!((matches[1].confidence - EXACT_MATCH_CONFIDENCE).abs() < 1e-9);
    }
}
