use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::analysis::extract::extract_text;
use crate::analysis::rubric::{evaluate, CriteriaResults, RubricReport};
use crate::analysis::upload::read_upload_form;
use crate::auth::session::MaybeAuthUser;
use crate::errors::AppError;
use crate::state::AppState;

/// Rubric result as returned to clients.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub score: u32,
    pub analysis: CriteriaResults,
    pub feedback: Vec<String>,
    /// Set when the score falls below the configured low-score threshold.
    pub needs_improvement: bool,
}

impl AnalyzeResponse {
    pub fn from_report(report: RubricReport, low_score_threshold: u32) -> Self {
        AnalyzeResponse {
            needs_improvement: report.score < low_score_threshold,
            score: report.score,
            analysis: report.analysis,
            feedback: report.feedback,
        }
    }
}

/// POST /api/v1/analyze
///
/// Scores an uploaded resume without storing anything.
pub async fn handle_analyze(
    State(state): State<AppState>,
    MaybeAuthUser(principal): MaybeAuthUser,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let text = extract_text(state.extractor.clone(), &form.upload).await?;
    let report = evaluate(&text);

    info!(
        user_id = ?principal.as_ref().map(|p| p.id),
        file_name = %form.upload.file_name,
        score = report.score,
        "Resume analyzed"
    );

    Ok(Json(AnalyzeResponse::from_report(
        report,
        state.config.low_score_threshold,
    )))
}
