use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::{FacetScoring, JobProfile, ScoringStrategy, SemanticScorer};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, CompletionService};
use crate::matching::distiller::truncate_chars;
use crate::matching::keywords::keyword_match;
use crate::matching::prompts::{fill_template, RUBRIC_PROMPT_TEMPLATE};
use crate::models::candidate::{Facet, FacetScore};

const RUBRIC_CHAR_LIMIT: usize = 4000;
const RUBRIC_MAX_TOKENS: u32 = 500;
const RUBRIC_TEMPERATURE: f32 = 0.2;

/// Strategy B: skill keywords matched locally, experience and soft skills judged by
/// one rubric call per resume.
pub struct RubricScorer {
    llm: Arc<dyn CompletionService>,
    vocabulary: Vec<String>,
}

impl RubricScorer {
    pub fn new(llm: Arc<dyn CompletionService>, vocabulary: Vec<String>) -> Self {
        Self { llm, vocabulary }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RubricJudgment {
    pub experience: RubricEntry,
    pub soft_skills: RubricEntry,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RubricEntry {
    pub score: f64,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Debug, Error)]
pub enum RubricParseError {
    #[error("reply is not valid rubric JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{facet} score {value} is outside 0.0 – 1.0")]
    OutOfRange { facet: Facet, value: f64 },
}

/// Strictly parses the model's rubric reply. Anything other than the expected JSON
/// object with in-range scores is an error; the caller zeroes both facets.
pub fn parse_rubric(reply: &str) -> Result<RubricJudgment, RubricParseError> {
    let judgment: RubricJudgment = serde_json::from_str(strip_json_fences(reply))?;

    for (facet, entry) in [
        (Facet::Experience, &judgment.experience),
        (Facet::SoftSkills, &judgment.soft_skills),
    ] {
        if !(0.0..=1.0).contains(&entry.score) {
            return Err(RubricParseError::OutOfRange {
                facet,
                value: entry.score,
            });
        }
    }

    Ok(judgment)
}

fn build_rubric_prompt(job_description: &str, resume_text: &str) -> String {
    fill_template(
        RUBRIC_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            (
                "job_description",
                truncate_chars(job_description, RUBRIC_CHAR_LIMIT),
            ),
            ("resume_text", truncate_chars(resume_text, RUBRIC_CHAR_LIMIT)),
        ],
    )
}

#[async_trait]
impl SemanticScorer for RubricScorer {
    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Rubric
    }

    async fn prepare_job(&self, job_description: &str) -> Result<JobProfile, AppError> {
        Ok(JobProfile {
            description: job_description.to_string(),
            facets: vec![],
        })
    }

    async fn score(&self, job: &JobProfile, resume_text: &str) -> FacetScoring {
        let mut scoring = FacetScoring::default();

        let keywords = keyword_match(resume_text, &self.vocabulary);
        scoring.scores.push(FacetScore::new(
            Facet::Keywords,
            keywords.score,
            keywords.rationale(),
        ));

        let prompt = build_rubric_prompt(&job.description, resume_text);
        let judgment = match self
            .llm
            .complete(&prompt, RUBRIC_MAX_TOKENS, RUBRIC_TEMPERATURE)
            .await
        {
            Ok(reply) => parse_rubric(&reply)
                .map_err(|e| format!("Rubric reply rejected: {e}")),
            Err(e) => Err(format!("Rubric call failed: {e}")),
        };

        match judgment {
            Ok(judgment) => {
                scoring.scores.push(FacetScore::new(
                    Facet::Experience,
                    judgment.experience.score,
                    judgment.experience.rationale,
                ));
                scoring.scores.push(FacetScore::new(
                    Facet::SoftSkills,
                    judgment.soft_skills.score,
                    judgment.soft_skills.rationale,
                ));
            }
            Err(message) => {
                warn!("{}", message);
                scoring.scores.push(FacetScore::unavailable(Facet::Experience));
                scoring.scores.push(FacetScore::unavailable(Facet::SoftSkills));
                scoring.warnings.push(message);
            }
        }

        scoring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ServiceError;
    use crate::matching::keywords::default_vocabulary;

    struct CannedLlm(Result<&'static str, u16>);

    #[async_trait]
    impl CompletionService for CannedLlm {
        async fn complete(&self, prompt: &str, _: u32, _: f32) -> Result<String, ServiceError> {
            assert!(prompt.contains("JOB DESCRIPTION:"));
            assert!(prompt.contains("RESUME:"));
            self.0.map(str::to_string).map_err(|status| ServiceError::Api {
                status,
                message: "upstream unavailable".to_string(),
            })
        }
    }

    const GOOD_REPLY: &str = r#"{
        "experience": {"score": 0.8, "rationale": "Five years of backend work"},
        "soft_skills": {"score": 0.6, "rationale": "Mentored two juniors"}
    }"#;

    fn job() -> JobProfile {
        JobProfile {
            description: "Python backend engineer".to_string(),
            facets: vec![],
        }
    }

    #[test]
    fn test_parse_accepts_expected_shape() {
        let judgment = parse_rubric(GOOD_REPLY).unwrap();
        assert_eq!(judgment.experience.score, 0.8);
        assert_eq!(judgment.soft_skills.rationale, "Mentored two juniors");
    }

    #[test]
    fn test_parse_accepts_fenced_json() {
        let fenced = format!("```json\n{GOOD_REPLY}\n```");
        assert!(parse_rubric(&fenced).is_ok());
    }

    #[test]
    fn test_parse_rejects_python_style_literals() {
        let reply = "{'experience': {'score': 0.8, 'rationale': 'x'}, 'soft_skills': {'score': 0.5, 'rationale': 'y'}}";
        assert!(matches!(parse_rubric(reply), Err(RubricParseError::Json(_))));
    }

    #[test]
    fn test_parse_rejects_expressions() {
        let reply = r#"{"experience": {"score": __import__('os').getpid(), "rationale": ""}, "soft_skills": {"score": 0.5}}"#;
        assert!(parse_rubric(reply).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_facet() {
        let reply = r#"{"experience": {"score": 0.8, "rationale": "ok"}}"#;
        assert!(parse_rubric(reply).is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_scores() {
        let reply = r#"{"experience": {"score": 8, "rationale": "x"}, "soft_skills": {"score": 0.5, "rationale": "y"}}"#;
        assert!(matches!(
            parse_rubric(reply),
            Err(RubricParseError::OutOfRange {
                facet: Facet::Experience,
                ..
            })
        ));
    }

    #[test]
    fn test_prompt_truncates_long_inputs() {
        let resume = format!("{}RESUME_TAIL", "r".repeat(RUBRIC_CHAR_LIMIT));
        let prompt = build_rubric_prompt("Rust engineer", &resume);
        assert!(!prompt.contains("RESUME_TAIL"));
        assert!(prompt.contains("Rust engineer"));
        assert!(prompt.contains("valid JSON only"));
    }

    #[test]
    fn test_prompt_inserts_resume_once_when_job_mentions_placeholder() {
        let prompt = build_rubric_prompt("Paste your {resume_text} below", "CANDIDATE_BODY");
        assert_eq!(prompt.matches("CANDIDATE_BODY").count(), 1);
        assert!(prompt.contains("Paste your {resume_text} below"));
    }

    #[tokio::test]
    async fn test_scores_all_three_facets_in_order() {
        let scorer = RubricScorer::new(Arc::new(CannedLlm(Ok(GOOD_REPLY))), default_vocabulary());

        let scoring = scorer.score(&job(), "Python, SQL and Git on Linux").await;

        assert!(scoring.warnings.is_empty());
        let values: Vec<(Facet, f64)> = scoring.scores.iter().map(|s| (s.facet, s.value)).collect();
        assert_eq!(values[0].0, Facet::Keywords);
        assert!((values[0].1 - 4.0 / 11.0).abs() < 1e-12);
        assert_eq!(values[1], (Facet::Experience, 0.8));
        assert_eq!(values[2], (Facet::SoftSkills, 0.6));
    }

    #[tokio::test]
    async fn test_malformed_reply_fails_closed() {
        let scorer = RubricScorer::new(
            Arc::new(CannedLlm(Ok("Sure! The candidate looks great."))),
            default_vocabulary(),
        );

        let scoring = scorer.score(&job(), "Python developer").await;

        assert_eq!(scoring.scores.len(), 3);
        assert!(scoring.scores[0].value > 0.0);
        for score in &scoring.scores[1..] {
            assert_eq!(score.value, 0.0);
            assert_eq!(score.rationale, "N/A");
        }
        assert_eq!(scoring.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_service_failure_is_isolated_to_model_facets() {
        let scorer = RubricScorer::new(Arc::new(CannedLlm(Err(503))), default_vocabulary());

        let scoring = scorer.score(&job(), "Python developer").await;

        assert_eq!(scoring.scores[0].facet, Facet::Keywords);
        assert_eq!(scoring.scores[1], FacetScore::unavailable(Facet::Experience));
        assert_eq!(scoring.scores[2], FacetScore::unavailable(Facet::SoftSkills));
        assert!(scoring.warnings[0].contains("503"));
    }

    #[tokio::test]
    async fn test_prepare_job_makes_no_calls() {
        let scorer = RubricScorer::new(Arc::new(CannedLlm(Err(500))), vec![]);
        let profile = scorer.prepare_job("Rust engineer").await.unwrap();
        assert!(profile.facets.is_empty());
        assert_eq!(profile.description, "Rust engineer");
    }
}
