use std::sync::Arc;

use crate::config::Config;
use crate::matching::pipeline::MatchPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extractor and scorer are fixed at startup; the scorer backend comes from
    /// `SCORING_STRATEGY`.
    pub pipeline: Arc<MatchPipeline>,
}
