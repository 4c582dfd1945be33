//! Result export: flat, ranked rows for JSON responses and CSV downloads.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::matching::scorer::ScoringStrategy;
use crate::matching::weights::NormalizedWeights;
use crate::models::candidate::{CandidateResult, Facet, FacetScore, ScoreBand};
use crate::models::report::{MatchReport, RunWarning};

pub const CSV_FILE_NAME: &str = "resume_matches.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// One ranked candidate as presented to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub rank: usize,
    pub resume_name: String,
    pub match_score: f64,
    pub band: ScoreBand,
    pub facet_scores: Vec<FacetScore>,
    pub email: String,
    pub profile_url: String,
}

impl ResultRow {
    fn from_candidate(rank: usize, candidate: &CandidateResult) -> Self {
        Self {
            rank,
            resume_name: candidate.name.clone(),
            match_score: candidate.final_score,
            band: candidate.band(),
            facet_scores: candidate.facet_scores.clone(),
            email: candidate.contact.email.clone(),
            profile_url: candidate.contact.profile_url.clone(),
        }
    }

    fn facet(&self, facet: Facet) -> Option<&FacetScore> {
        self.facet_scores
            .get(facet.index())
            .filter(|s| s.facet == facet)
    }
}

/// JSON body of `POST /api/v1/match`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub strategy: ScoringStrategy,
    pub weights: NormalizedWeights,
    pub documents_received: usize,
    pub results: Vec<ResultRow>,
    pub warnings: Vec<RunWarning>,
}

impl From<MatchReport> for MatchResponse {
    fn from(report: MatchReport) -> Self {
        Self {
            run_id: report.run_id,
            generated_at: report.generated_at,
            strategy: report.strategy,
            weights: report.weights,
            documents_received: report.documents_received,
            results: to_rows(&report.ranked),
            warnings: report.warnings,
        }
    }
}

/// Rows in ranked order, ranks starting at 1.
pub fn to_rows(ranked: &[CandidateResult]) -> Vec<ResultRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, candidate)| ResultRow::from_candidate(i + 1, candidate))
        .collect()
}

pub fn header(include_rationale: bool) -> Vec<String> {
    let mut columns = vec!["Resume Name".to_string(), "Match Score".to_string()];
    columns.extend(Facet::ALL.iter().map(|f| f.column_label().to_string()));
    if include_rationale {
        columns.extend(
            Facet::ALL
                .iter()
                .map(|f| format!("{} Rationale", f.column_label())),
        );
    }
    columns.push("Email".to_string());
    columns.push("Profile URL".to_string());
    columns
}

fn row_cells(row: &ResultRow, include_rationale: bool) -> Vec<String> {
    let mut cells = vec![row.resume_name.clone(), format_score(row.match_score)];
    cells.extend(Facet::ALL.iter().map(|f| {
        row.facet(*f)
            .map(|s| format_score(s.value))
            .unwrap_or_default()
    }));
    if include_rationale {
        cells.extend(Facet::ALL.iter().map(|f| {
            row.facet(*f)
                .map(|s| s.rationale.clone())
                .unwrap_or_default()
        }));
    }
    cells.push(row.email.clone());
    cells.push(row.profile_url.clone());
    cells
}

fn format_score(value: f64) -> String {
    format!("{value:.4}")
}

/// Renders rows as CSV: header first, one line per candidate in ranked order.
pub fn to_csv(rows: &[ResultRow], include_rationale: bool) -> String {
    let mut out = String::new();
    push_record(&mut out, &header(include_rationale));
    for row in rows {
        push_record(&mut out, &row_cells(row, include_rationale));
    }
    out
}

fn push_record(out: &mut String, cells: &[String]) {
    let line: Vec<Cow<'_, str>> = cells.iter().map(|c| escape_field(c)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Quotes a field containing a comma, quote, CR or LF; inner quotes are doubled.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
