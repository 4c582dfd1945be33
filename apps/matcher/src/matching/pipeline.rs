//! Match pipeline: validates inputs, prepares the job once, scores every resume with
//! bounded concurrency and ranks the results.
//!
//! Failure policy:
//! - configuration problems fail the run before any external call;
//! - job preparation failures fail the run;
//! - a document that cannot be extracted is dropped with a warning;
//! - a facet whose model call fails scores 0.0 / "N/A" with a warning.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{AppError, ConfigurationError};
use crate::extraction::{Document, DocumentExtractor, ExtractionError};
use crate::matching::aggregate::aggregate;
use crate::matching::contact::extract_contact;
use crate::matching::ranking::rank;
use crate::matching::scorer::{JobProfile, SemanticScorer};
use crate::matching::weights::{NormalizedWeights, WeightConfig};
use crate::models::candidate::CandidateResult;
use crate::models::report::{MatchReport, RunWarning};

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub job_description: String,
    pub documents: Vec<Document>,
    pub weights: WeightConfig,
}

type DocumentOutcome = Result<(CandidateResult, Vec<RunWarning>), RunWarning>;

pub struct MatchPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    scorer: Arc<dyn SemanticScorer>,
    max_concurrency: usize,
    extraction_timeout: Duration,
}

impl MatchPipeline {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        scorer: Arc<dyn SemanticScorer>,
        max_concurrency: usize,
        extraction_timeout: Duration,
    ) -> Self {
        Self {
            extractor,
            scorer,
            max_concurrency: max_concurrency.max(1),
            extraction_timeout,
        }
    }

    pub async fn run(&self, request: MatchRequest) -> Result<MatchReport, AppError> {
        let job_description = request.job_description.trim();
        if job_description.is_empty() {
            return Err(ConfigurationError::EmptyJobDescription.into());
        }
        if request.documents.is_empty() {
            return Err(ConfigurationError::NoDocuments.into());
        }
        let weights = request.weights.normalize()?;

        let run_id = Uuid::new_v4();
        let documents_received = request.documents.len();
        info!(
            %run_id,
            documents = documents_received,
            strategy = ?self.scorer.strategy(),
            "Starting match run"
        );

        let job = self.scorer.prepare_job(job_description).await?;
        for facet in &job.facets {
            debug!(%run_id, facet = %facet.facet, summary = %facet.summary, "Job facet prepared");
        }
        let job = &job;
        let weights_ref = &weights;

        // `buffered` yields in upload order whatever the completion order.
        let outcomes: Vec<DocumentOutcome> = stream::iter(request.documents)
            .map(move |document| async move {
                self.process_document(document, job, weights_ref).await
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut candidates = Vec::with_capacity(outcomes.len());
        let mut warnings = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok((candidate, facet_warnings)) => {
                    candidates.push(candidate);
                    warnings.extend(facet_warnings);
                }
                Err(warning) => warnings.push(warning),
            }
        }

        let ranked = rank(candidates);

        info!(
            %run_id,
            scored = ranked.len(),
            excluded = documents_received - ranked.len(),
            warnings = warnings.len(),
            "Match run complete"
        );

        Ok(MatchReport {
            run_id,
            generated_at: Utc::now(),
            strategy: self.scorer.strategy(),
            weights,
            documents_received,
            ranked,
            warnings,
        })
    }

    async fn process_document(
        &self,
        document: Document,
        job: &JobProfile,
        weights: &NormalizedWeights,
    ) -> DocumentOutcome {
        let name = document.name.clone();

        let text = self.extract_text(document).await.map_err(|err| {
            warn!(document = %name, error = %err, "Excluding document");
            RunWarning::new(&name, err.to_string())
        })?;

        let contact = extract_contact(&text);
        let scoring = self.scorer.score(job, &text).await;
        let final_score = aggregate(&scoring.scores, weights);

        let warnings = scoring
            .warnings
            .into_iter()
            .map(|message| RunWarning::new(&name, message))
            .collect();

        Ok((
            CandidateResult {
                name,
                final_score,
                facet_scores: scoring.scores,
                contact,
            },
            warnings,
        ))
    }

    /// Runs the extractor on a blocking thread under the per-call timeout.
    async fn extract_text(&self, document: Document) -> Result<String, ExtractionError> {
        let extractor = Arc::clone(&self.extractor);
        let task = tokio::task::spawn_blocking(move || extractor.extract(&document));

        match tokio::time::timeout(self.extraction_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ExtractionError::Worker(join_error.to_string())),
            Err(_) => Err(ExtractionError::Timeout(self.extraction_timeout)),
        }
    }
}
