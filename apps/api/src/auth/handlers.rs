//! Handlers for `/auth` (register, login, session) and `/me`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::jwt::issue_session_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::models::linkedin::LinkedInProfileRow;
use crate::models::resume::ResumeWithAnalysis;
use crate::models::subscription::SubscriptionRow;
use crate::models::user::{NewUser, Principal, ROLE_USER};
use crate::resumes::load_resumes_with_analyses;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Both fields default to empty so a missing field fails like a wrong one.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Session lifetime in seconds.
    pub expires_in: i64,
    pub user: Principal,
}

/// Everything the dashboard shows for the signed-in user.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Principal,
    pub linkedin_profile: Option<LinkedInProfileRow>,
    pub resumes: Vec<ResumeWithAnalysis>,
    pub subscription: Option<SubscriptionRow>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Principal>), AppError> {
    let email = normalize_email(&input.email);
    if !is_plausible_email(&email) {
        return Err(AppError::Validation("A valid email address is required".to_string()));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::Validation)?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing error: {e}")))?;

    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let user = state
        .users
        .create(NewUser {
            email,
            name,
            password_hash,
            role: ROLE_USER.to_string(),
        })
        .await?;

    info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(Principal::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Unknown email, wrong password, and missing fields all produce the same
/// `InvalidCredentials` error.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&input.email);
    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::InvalidCredentials);
    }

    let principal = Principal::from(&user);
    let token = issue_session_token(&principal, &state.config.jwt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation error: {e}")))?;

    info!(user_id = %user.id, "User logged in");
    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.max_age_secs,
        user: principal,
    }))
}

/// GET /api/v1/auth/session
pub async fn handle_session(AuthUser(principal): AuthUser) -> Json<Principal> {
    Json(principal)
}

/// GET /api/v1/me
pub async fn handle_me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .users
        .find_by_id(principal.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let linkedin_profile = state.linkedin.find_by_user(user.id).await?;
    let resumes = load_resumes_with_analyses(&state, user.id).await?;
    let subscription = state.subscriptions.find_by_user(user.id).await?;

    Ok(Json(MeResponse {
        user: Principal::from(&user),
        linkedin_profile,
        resumes,
        subscription,
    }))
}
