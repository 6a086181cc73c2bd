use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api"
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{body_json, get, TestApp};

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();
        let response = app.send(get("/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "resume-api");
    }
}
