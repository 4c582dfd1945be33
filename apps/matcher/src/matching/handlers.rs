use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::extraction::Document;
use crate::matching::export::{to_csv, to_rows, MatchResponse, CSV_CONTENT_TYPE, CSV_FILE_NAME};
use crate::matching::pipeline::MatchRequest;
use crate::matching::weights::WeightConfig;
use crate::state::AppState;

/// Multipart field names accepted for resume uploads.
const RESUME_FIELDS: [&str; 3] = ["resumes", "resumes[]", "files"];

/// A decoded match form.
struct MatchForm {
    request: MatchRequest,
    include_rationale: bool,
}

/// Reads the multipart body. Weights left out of the form fall back to `defaults`;
/// content checks (empty description, no files, bad weight sum) belong to the pipeline.
async fn read_match_form(
    mut multipart: Multipart,
    defaults: WeightConfig,
) -> Result<MatchForm, AppError> {
    let mut job_description = String::new();
    let mut weights = defaults;
    let mut include_rationale = false;
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if RESUME_FIELDS.contains(&name.as_str()) {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            // Browsers submit an empty part when no file was chosen.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            documents.push(Document::new(file_name, bytes));
            continue;
        }

        match name.as_str() {
            "job_description" => job_description = field.text().await?,
            "weight_keywords" => {
                weights.keywords = parse_weight(&name, &field.text().await?, weights.keywords)?
            }
            "weight_experience" => {
                weights.experience =
                    parse_weight(&name, &field.text().await?, weights.experience)?
            }
            "weight_soft_skills" => {
                weights.soft_skills =
                    parse_weight(&name, &field.text().await?, weights.soft_skills)?
            }
            "include_rationale" => include_rationale = parse_flag(&field.text().await?)?,
            other => debug!("Ignoring unknown form field '{}'", other),
        }
    }

    Ok(MatchForm {
        request: MatchRequest {
            job_description,
            documents,
            weights,
        },
        include_rationale,
    })
}

/// Blank means "use the default".
fn parse_weight(field: &str, raw: &str, default: f64) -> Result<f64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    raw.parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{field} must be a number (got '{raw}')")))
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Validation(format!(
            "include_rationale must be a boolean (got '{other}')"
        ))),
    }
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<MatchResponse>, AppError> {
    let form = read_match_form(multipart, state.config.default_weights).await?;
    let report = state.pipeline.run(form.request).await?;
    Ok(Json(MatchResponse::from(report)))
}

/// POST /api/v1/match/csv
pub async fn handle_match_csv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_match_form(multipart, state.config.default_weights).await?;
    let report = state.pipeline.run(form.request).await?;
    let csv = to_csv(&to_rows(&report.ranked), form.include_rationale);

    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
