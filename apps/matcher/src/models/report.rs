use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::scorer::ScoringStrategy;
use crate::matching::weights::NormalizedWeights;
use crate::models::candidate::CandidateResult;

/// A failure that did not abort the run: an excluded document or a zeroed facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWarning {
    pub document: String,
    pub message: String,
}

impl RunWarning {
    pub fn new(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            message: message.into(),
        }
    }
}

/// Outcome of one matching run. Recomputed per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub strategy: ScoringStrategy,
    pub weights: NormalizedWeights,
    pub documents_received: usize,
    /// Sorted by `final_score` descending, ties in upload order.
    pub ranked: Vec<CandidateResult>,
    pub warnings: Vec<RunWarning>,
}
