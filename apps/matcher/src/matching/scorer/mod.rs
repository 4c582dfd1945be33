//! Semantic scoring: pluggable, trait-based scorer producing one score per facet.
//!
//! Two backends:
//! - `EmbeddingScorer`: distill each facet, embed, compare by cosine similarity.
//! - `RubricScorer`: local keyword matching for skills plus one model rubric call
//!   for experience and soft skills.
//!
//! `MatchPipeline` holds an `Arc<dyn SemanticScorer>`, chosen at startup via config.

mod embedding;
mod rubric;

pub use embedding::EmbeddingScorer;
pub use rubric::RubricScorer;

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::candidate::{Facet, FacetScore};

// ────────────────────────────────────────────────────────────────────────────
// Shared data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    Embedding,
    Rubric,
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "embedding" => Ok(ScoringStrategy::Embedding),
            "rubric" => Ok(ScoringStrategy::Rubric),
            other => Err(format!(
                "unknown scoring strategy '{other}' (expected 'embedding' or 'rubric')"
            )),
        }
    }
}

/// Job-side state computed once per run and shared read-only by every candidate.
#[derive(Debug, Clone)]
pub struct JobProfile {
    pub description: String,
    /// Per-facet summaries and embeddings. Empty for backends that need neither.
    pub facets: Vec<JobFacet>,
}

impl JobProfile {
    pub fn facet(&self, facet: Facet) -> Option<&JobFacet> {
        self.facets.iter().find(|f| f.facet == facet)
    }
}

#[derive(Debug, Clone)]
pub struct JobFacet {
    pub facet: Facet,
    pub summary: String,
    pub embedding: Vec<f32>,
}

/// Scores for one resume, ordered as `Facet::ALL`, plus any per-facet failures.
#[derive(Debug, Clone, Default)]
pub struct FacetScoring {
    pub scores: Vec<FacetScore>,
    pub warnings: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to add a scoring backend without touching the aggregator,
/// ranker or handlers.
#[async_trait]
pub trait SemanticScorer: Send + Sync {
    fn strategy(&self) -> ScoringStrategy;

    /// Builds the shared job profile. Called once per run before any candidate work;
    /// an error here aborts the run.
    async fn prepare_job(&self, job_description: &str) -> Result<JobProfile, AppError>;

    /// Scores one resume. Never fails: a facet whose model call fails scores 0.0
    /// with an "N/A" rationale and a warning.
    async fn score(&self, job: &JobProfile, resume_text: &str) -> FacetScoring;
}

// ────────────────────────────────────────────────────────────────────────────
// Vector similarity
// ────────────────────────────────────────────────────────────────────────────

/// `dot(a, b) / (‖a‖ · ‖b‖)`, computed in f64. Returns 0.0 for zero-norm vectors or
/// mismatched dimensions.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_of_vector_with_itself_is_one() {
        let v = vec![0.3, -1.2, 4.5, 0.01];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vec![0.1, 0.9, -0.4];
        let b = vec![0.7, 0.2, 0.5];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_orthogonal_vectors_score_zero_and_opposite_minus_one() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_strategy_parses_case_insensitively() {
        assert_eq!(
            "Embedding".parse::<ScoringStrategy>(),
            Ok(ScoringStrategy::Embedding)
        );
        assert_eq!(" rubric ".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Rubric));
        assert!("tfidf".parse::<ScoringStrategy>().is_err());
    }
}
