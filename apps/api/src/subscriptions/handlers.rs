use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::models::subscription::{SubscriptionRow, SubscriptionStatus};
use crate::state::AppState;
use crate::subscriptions::plans::{find_plan, Plan, PLANS};

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan: String,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub status: String,
    pub end_date: Option<DateTime<Utc>>,
}

/// GET /api/v1/plans
pub async fn handle_list_plans() -> Json<&'static [Plan]> {
    Json(PLANS)
}

/// POST /api/v1/subscriptions
pub async fn handle_create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(input): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionRow>), AppError> {
    let plan = find_plan(&input.plan)
        .ok_or_else(|| AppError::Validation(format!("Unknown plan '{}'", input.plan)))?;

    if state.subscriptions.find_by_user(principal.id).await?.is_some() {
        return Err(AppError::Conflict("Subscription already exists".to_string()));
    }

    let subscription = state
        .subscriptions
        .create(principal.id, plan.id, Utc::now(), input.end_date)
        .await?;

    info!(user_id = %principal.id, plan = plan.id, "Subscription created");
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// PATCH /api/v1/subscriptions
pub async fn handle_update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(input): Json<UpdateSubscriptionRequest>,
) -> Result<Json<SubscriptionRow>, AppError> {
    let status: SubscriptionStatus = input.status.parse().map_err(AppError::Validation)?;

    let subscription = state
        .subscriptions
        .update_status(principal.id, status, input.end_date)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

    info!(user_id = %principal.id, %status, "Subscription status changed");
    Ok(Json(subscription))
}

/// GET /api/v1/subscriptions
pub async fn handle_get(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<SubscriptionRow>, AppError> {
    state
        .subscriptions
        .find_by_user(principal.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))
}
