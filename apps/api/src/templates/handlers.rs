use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::session::{AuthUser, MaybeAuthUser};
use crate::errors::AppError;
use crate::models::template::{NewTemplate, NewTemplateDownload, Template, TemplateCategory};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    #[serde(default, alias = "template_id")]
    pub template_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TemplateStats {
    pub downloads: i64,
}

fn template_not_found() -> AppError {
    AppError::NotFound("Template not found".to_string())
}

/// GET /api/v1/templates[?category=]
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<Vec<Template>>, AppError> {
    let templates = match params.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            state.templates.list_by_category(category).await?
        }
        _ => state.templates.list().await?,
    };
    Ok(Json(templates))
}

/// GET /api/v1/templates/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Template>, AppError> {
    state
        .templates
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(template_not_found)
}

/// GET /api/v1/templates/categories
pub async fn handle_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateCategory>>, AppError> {
    Ok(Json(state.templates.list_categories().await?))
}

/// GET /api/v1/templates/:id/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TemplateStats>, AppError> {
    state
        .templates
        .find_by_id(id)
        .await?
        .ok_or_else(template_not_found)?;
    let downloads = state.templates.download_count(id).await?;
    Ok(Json(TemplateStats { downloads }))
}

/// POST /api/v1/templates (admin only)
pub async fn handle_create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<NewTemplate>,
) -> Result<(StatusCode, Json<Template>), AppError> {
    auth.require_admin()?;
    if input.name.trim().is_empty() || input.category.trim().is_empty() {
        return Err(AppError::Validation(
            "Template name and category are required".to_string(),
        ));
    }

    let template = state.templates.create(input).await?;
    info!(template_id = template.id, category = %template.category, "Template created");
    Ok((StatusCode::CREATED, Json(template)))
}

/// POST /api/v1/templates/download
///
/// Records one download. Anonymous callers may download free templates;
/// premium ones return 401 and nothing is recorded.
pub async fn handle_record_download(
    State(state): State<AppState>,
    MaybeAuthUser(principal): MaybeAuthUser,
    headers: HeaderMap,
    Json(input): Json<DownloadRequest>,
) -> Result<Json<Value>, AppError> {
    let template_id = input
        .template_id
        .ok_or_else(|| AppError::Validation("Template ID is required".to_string()))?;

    let template = state
        .templates
        .find_by_id(template_id)
        .await?
        .ok_or_else(template_not_found)?;

    if template.is_premium && principal.is_none() {
        return Err(AppError::Unauthorized(
            "Premium templates require authentication".to_string(),
        ));
    }

    let download = state
        .templates
        .record_download(NewTemplateDownload {
            template_id,
            user_id: principal.as_ref().map(|p| p.id),
            ip_address: client_ip(&headers),
            user_agent: header_value(&headers, "user-agent"),
        })
        .await?;

    info!(
        template_id,
        download_id = download.id,
        user_id = ?download.user_id,
        "Template download recorded"
    );
    Ok(Json(json!({ "success": true })))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First hop of `x-forwarded-for`, else `x-real-ip`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for")
        .and_then(|chain| {
            chain
                .split(',')
                .map(str::trim)
                .find(|hop| !hop.is_empty())
                .map(str::to_string)
        })
        .or_else(|| header_value(headers, "x-real-ip"))
}
