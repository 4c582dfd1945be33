//! Field distillation: asks the model to summarise one facet of a resume or job description.
//!
//! Only the first `DISTILL_CHAR_LIMIT` characters are sent. Long documents lose their
//! tail; this bounds cost and latency per call.

use std::sync::Arc;

use thiserror::Error;

use crate::llm_client::{CompletionService, ServiceError};
use crate::matching::prompts::{fill_template, DISTILL_PROMPT_TEMPLATE};
use crate::models::candidate::Facet;

pub const DISTILL_CHAR_LIMIT: usize = 2000;
const DISTILL_MAX_TOKENS: u32 = 300;
const DISTILL_TEMPERATURE: f32 = 0.2;

/// Which side of the comparison a text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    Resume,
    Job,
}

impl DocumentRole {
    fn noun(self) -> &'static str {
        match self {
            DocumentRole::Resume => "resume",
            DocumentRole::Job => "job description",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            DocumentRole::Resume => "Resume",
            DocumentRole::Job => "Job Description",
        }
    }
}

impl std::fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun())
    }
}

#[derive(Debug, Error)]
#[error("Distilling {facet} from {role} failed: {source}")]
pub struct DistillationError {
    pub facet: Facet,
    pub role: DocumentRole,
    #[source]
    pub source: ServiceError,
}

#[derive(Clone)]
pub struct FieldDistiller {
    llm: Arc<dyn CompletionService>,
}

impl FieldDistiller {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    pub async fn distill(
        &self,
        text: &str,
        facet: Facet,
        role: DocumentRole,
    ) -> Result<String, DistillationError> {
        let prompt = build_distill_prompt(text, facet, role);
        self.llm
            .complete(&prompt, DISTILL_MAX_TOKENS, DISTILL_TEMPERATURE)
            .await
            .map(|reply| reply.trim().to_string())
            .map_err(|source| DistillationError {
                facet,
                role,
                source,
            })
    }
}

pub fn build_distill_prompt(text: &str, facet: Facet, role: DocumentRole) -> String {
    fill_template(
        DISTILL_PROMPT_TEMPLATE,
        &[
            ("facet", facet.prompt_label()),
            ("document_noun", role.noun()),
            ("document_heading", role.heading()),
            ("text", truncate_chars(text, DISTILL_CHAR_LIMIT)),
        ],
    )
}

/// First `limit` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
