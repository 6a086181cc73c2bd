pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::analysis::upload::MAX_UPLOAD_BYTES;
use crate::auth::handlers as auth;
use crate::linkedin::handlers as linkedin;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::subscriptions::handlers as subscriptions;
use crate::templates::handlers as templates;

/// Request bodies may exceed the upload limit so oversize files reach the
/// upload gate and get its message instead of a bare 413.
const BODY_LIMIT_BYTES: usize = 2 * MAX_UPLOAD_BYTES;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        // Auth
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/session", get(auth::handle_session))
        .route("/api/v1/me", get(auth::handle_me))
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create).get(resumes::handle_list),
        )
        .route("/api/v1/resumes/upload", post(resumes::handle_upload))
        .route("/api/v1/resumes/:id/analyze", post(resumes::handle_reanalyze))
        .route(
            "/api/v1/resumes/:id/analysis",
            get(resumes::handle_get_analysis),
        )
        // LinkedIn
        .route(
            "/api/v1/linkedin",
            post(linkedin::handle_create)
                .patch(linkedin::handle_update)
                .get(linkedin::handle_get),
        )
        .route("/api/v1/linkedin/analyze", post(linkedin::handle_analyze))
        .route(
            "/api/v1/linkedin/analysis",
            get(linkedin::handle_get_analysis),
        )
        // Templates
        .route(
            "/api/v1/templates",
            get(templates::handle_list).post(templates::handle_create),
        )
        .route(
            "/api/v1/templates/categories",
            get(templates::handle_categories),
        )
        .route(
            "/api/v1/templates/download",
            post(templates::handle_record_download),
        )
        .route("/api/v1/templates/:id", get(templates::handle_get))
        .route("/api/v1/templates/:id/stats", get(templates::handle_stats))
        // Plans & subscriptions
        .route("/api/v1/plans", get(subscriptions::handle_list_plans))
        .route(
            "/api/v1/subscriptions",
            post(subscriptions::handle_create)
                .patch(subscriptions::handle_update)
                .get(subscriptions::handle_get),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
