use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{join_all, try_join_all};
use tracing::warn;

use super::{cosine_similarity, FacetScoring, JobFacet, JobProfile, ScoringStrategy, SemanticScorer};
use crate::errors::AppError;
use crate::llm_client::EmbeddingService;
use crate::matching::distiller::{DocumentRole, FieldDistiller};
use crate::models::candidate::{Facet, FacetScore};

/// Strategy A: per-facet distillation, embedding and cosine similarity.
///
/// Cost per run: 3 distill + 3 embed calls for the job, then the same per resume.
pub struct EmbeddingScorer {
    distiller: FieldDistiller,
    embedder: Arc<dyn EmbeddingService>,
}

impl EmbeddingScorer {
    pub fn new(distiller: FieldDistiller, embedder: Arc<dyn EmbeddingService>) -> Self {
        Self {
            distiller,
            embedder,
        }
    }

    async fn distill_and_embed(
        &self,
        text: &str,
        facet: Facet,
        role: DocumentRole,
    ) -> Result<(String, Vec<f32>), String> {
        let summary = self
            .distiller
            .distill(text, facet, role)
            .await
            .map_err(|e| e.to_string())?;
        let embedding = self
            .embedder
            .embed(&summary)
            .await
            .map_err(|e| format!("Embedding {facet} from {role} failed: {e}"))?;
        Ok((summary, embedding))
    }

    async fn score_facet(
        &self,
        job: &JobProfile,
        resume_text: &str,
        facet: Facet,
    ) -> Result<FacetScore, String> {
        let job_facet = job
            .facet(facet)
            .ok_or_else(|| format!("Job profile has no {facet} embedding"))?;
        let (_, embedding) = self
            .distill_and_embed(resume_text, facet, DocumentRole::Resume)
            .await?;
        let similarity = cosine_similarity(&job_facet.embedding, &embedding);
        Ok(FacetScore::new(facet, similarity, ""))
    }
}

#[async_trait]
impl SemanticScorer for EmbeddingScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Embedding
    }

    async fn prepare_job(&self, job_description: &str) -> Result<JobProfile, AppError> {
        let facets = try_join_all(Facet::ALL.into_iter().map(|facet| async move {
            let (summary, embedding) = self
                .distill_and_embed(job_description, facet, DocumentRole::Job)
                .await?;
            Ok::<_, String>(JobFacet {
                facet,
                summary,
                embedding,
            })
        }))
        .await
        .map_err(|e| AppError::Llm(format!("Job description preparation failed: {e}")))?;

        Ok(JobProfile {
            description: job_description.to_string(),
            facets,
        })
    }

    async fn score(&self, job: &JobProfile, resume_text: &str) -> FacetScoring {
        let results = join_all(
            Facet::ALL
                .into_iter()
                .map(|facet| self.score_facet(job, resume_text, facet)),
        )
        .await;

        let mut scoring = FacetScoring::default();
        for (facet, result) in Facet::ALL.into_iter().zip(results) {
            match result {
                Ok(score) => scoring.scores.push(score),
                Err(message) => {
                    warn!("Scoring {} failed: {}", facet, message);
                    scoring.scores.push(FacetScore::unavailable(facet));
                    scoring.warnings.push(message);
                }
            }
        }
        scoring
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::llm_client::{CompletionService, ServiceError};

    /// Echoes the facet label found in the prompt, so summaries are facet-specific.
    struct FacetEchoLlm {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl CompletionService for FacetEchoLlm {
        async fn complete(&self, prompt: &str, _: u32, _: f32) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(marker) = self.fail_on {
                if prompt.contains(marker) {
                    return Err(ServiceError::EmptyContent);
                }
            }
            let facet = ["soft skills", "experience", "keywords"]
                .into_iter()
                .find(|label| prompt.contains(&format!("Extract the {label} section")))
                .unwrap_or("unknown");
            Ok(facet.to_string())
        }
    }

    /// Maps each facet summary onto its own axis.
    struct AxisEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingService for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match text {
                "keywords" => vec![1.0, 0.0, 0.0],
                "experience" => vec![0.0, 1.0, 0.0],
                _ => vec![0.0, 0.0, 1.0],
            })
        }
    }

    fn scorer(fail_on: Option<&'static str>) -> (EmbeddingScorer, Arc<FacetEchoLlm>, Arc<AxisEmbedder>) {
        let llm = Arc::new(FacetEchoLlm {
            calls: AtomicUsize::new(0),
            fail_on,
        });
        let embedder = Arc::new(AxisEmbedder {
            calls: AtomicUsize::new(0),
        });
        let scorer = EmbeddingScorer::new(FieldDistiller::new(llm.clone()), embedder.clone());
        (scorer, llm, embedder)
    }

    #[tokio::test]
    async fn test_prepare_job_distills_and_embeds_each_facet_once() {
        let (scorer, llm, embedder) = scorer(None);

        let job = scorer.prepare_job("Backend engineer").await.unwrap();

        assert_eq!(job.facets.len(), 3);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        assert_eq!(job.facet(Facet::Experience).unwrap().summary, "experience");
    }

    #[tokio::test]
    async fn test_matching_summaries_score_one_per_facet() {
        let (scorer, _, _) = scorer(None);
        let job = scorer.prepare_job("Backend engineer").await.unwrap();

        let scoring = scorer.score(&job, "Python developer").await;

        assert!(scoring.warnings.is_empty());
        let facets: Vec<Facet> = scoring.scores.iter().map(|s| s.facet).collect();
        assert_eq!(facets, Facet::ALL.to_vec());
        for score in &scoring.scores {
            assert!((score.value - 1.0).abs() < 1e-6);
            assert_eq!(score.rationale, "");
        }
    }

    #[tokio::test]
    async fn test_failed_resume_facet_is_zeroed_with_warning() {
        let (scorer, _, _) = scorer(None);
        let job = scorer.prepare_job("Backend engineer").await.unwrap();
        let (failing, _, _) = scorer_with_failure();

        let scoring = failing.score(&job, "Python developer").await;

        let experience = &scoring.scores[Facet::Experience.index()];
        assert_eq!(experience.value, 0.0);
        assert_eq!(experience.rationale, "N/A");
        assert_eq!(scoring.warnings.len(), 1);
        assert!((scoring.scores[Facet::Keywords.index()].value - 1.0).abs() < 1e-6);
    }

    fn scorer_with_failure() -> (EmbeddingScorer, Arc<FacetEchoLlm>, Arc<AxisEmbedder>) {
        scorer(Some("Extract the experience section from this resume"))
    }

    #[tokio::test]
    async fn test_job_preparation_failure_aborts() {
        let (scorer, _, _) = scorer(Some("job description"));
        let err = scorer.prepare_job("Backend engineer").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
