use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;
use crate::matching::keywords::default_vocabulary;
use crate::matching::scorer::ScoringStrategy;
use crate::matching::weights::WeightConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or any value is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub scoring_strategy: ScoringStrategy,
    /// Skill terms for local keyword matching (rubric strategy).
    pub skill_vocabulary: Vec<String>,
    pub max_concurrent_documents: usize,
    /// Applied to every extraction, completion and embedding call.
    pub external_call_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Used for any weight the request leaves out.
    pub default_weights: WeightConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_weights = WeightConfig {
            keywords: parse_env("DEFAULT_WEIGHT_KEYWORDS", 0.5)?,
            experience: parse_env("DEFAULT_WEIGHT_EXPERIENCE", 0.3)?,
            soft_skills: parse_env("DEFAULT_WEIGHT_SOFT_SKILLS", 0.2)?,
        };
        default_weights
            .normalize()
            .context("DEFAULT_WEIGHT_* variables are invalid")?;

        let max_concurrent_documents: usize = parse_env("MAX_CONCURRENT_DOCUMENTS", 4)?;
        if max_concurrent_documents == 0 {
            return Err(anyhow!("MAX_CONCURRENT_DOCUMENTS must be at least 1"));
        }

        let timeout_secs: u64 = parse_env("EXTERNAL_CALL_TIMEOUT_SECS", 60)?;
        if timeout_secs == 0 {
            return Err(anyhow!("EXTERNAL_CALL_TIMEOUT_SECS must be at least 1"));
        }

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scoring_strategy: match std::env::var("SCORING_STRATEGY") {
                Ok(value) => ScoringStrategy::from_str(&value).map_err(anyhow::Error::msg)?,
                Err(_) => ScoringStrategy::Embedding,
            },
            skill_vocabulary: std::env::var("SKILL_VOCABULARY")
                .ok()
                .map(|v| parse_vocabulary(&v))
                .filter(|terms| !terms.is_empty())
                .unwrap_or_else(default_vocabulary),
            max_concurrent_documents,
            external_call_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            default_weights,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Comma-separated terms, trimmed and lower-cased; blanks dropped.
fn parse_vocabulary(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}
