use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::linkedin::completeness::{analyze_profile, ProfileReport};
use crate::models::analysis::{Analysis, AnalysisSubject};
use crate::models::linkedin::{LinkedInProfileRow, LinkedInProfileUpdate, NewLinkedInProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileAnalysisResponse {
    pub report: ProfileReport,
    pub analysis: Analysis,
}

fn profile_not_found() -> AppError {
    AppError::NotFound("LinkedIn profile not found".to_string())
}

/// POST /api/v1/linkedin
pub async fn handle_create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(input): Json<NewLinkedInProfile>,
) -> Result<(StatusCode, Json<LinkedInProfileRow>), AppError> {
    if input.profile_url.trim().is_empty() {
        return Err(AppError::Validation("Profile URL is required".to_string()));
    }
    if state.linkedin.find_by_user(principal.id).await?.is_some() {
        return Err(AppError::Conflict("LinkedIn profile already exists".to_string()));
    }

    let profile = state.linkedin.create(principal.id, input).await?;
    info!(user_id = %principal.id, profile_id = %profile.id, "LinkedIn profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

/// PATCH /api/v1/linkedin
pub async fn handle_update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(update): Json<LinkedInProfileUpdate>,
) -> Result<Json<LinkedInProfileRow>, AppError> {
    let profile = state
        .linkedin
        .update_by_user(principal.id, update)
        .await?
        .ok_or_else(profile_not_found)?;
    info!(user_id = %principal.id, "LinkedIn profile updated");
    Ok(Json(profile))
}

/// GET /api/v1/linkedin
pub async fn handle_get(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<LinkedInProfileRow>, AppError> {
    state
        .linkedin
        .find_by_user(principal.id)
        .await?
        .map(Json)
        .ok_or_else(profile_not_found)
}

/// POST /api/v1/linkedin/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ProfileAnalysisResponse>, AppError> {
    let profile = state
        .linkedin
        .find_by_user(principal.id)
        .await?
        .ok_or_else(profile_not_found)?;

    let report = analyze_profile(&profile);
    let analysis = state
        .analyses
        .save(
            AnalysisSubject::LinkedInProfile(profile.id),
            report.to_new_analysis(),
        )
        .await?;

    info!(profile_id = %profile.id, score = report.score, "LinkedIn profile analyzed");
    Ok(Json(ProfileAnalysisResponse { report, analysis }))
}

/// GET /api/v1/linkedin/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Analysis>, AppError> {
    let profile = state
        .linkedin
        .find_by_user(principal.id)
        .await?
        .ok_or_else(profile_not_found)?;
    state
        .analyses
        .find_by_linkedin_profile(profile.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No analysis for LinkedIn profile".to_string()))
}
