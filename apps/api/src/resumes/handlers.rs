use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::extract::extract_text;
use crate::analysis::handlers::AnalyzeResponse;
use crate::analysis::rubric::evaluate;
use crate::analysis::upload::read_upload_form;
use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::models::analysis::{Analysis, AnalysisSubject};
use crate::models::resume::{NewResume, ResumeRow, ResumeWithAnalysis};
use crate::resumes::{find_owned_resume, load_resumes_with_analyses};
use crate::state::AppState;
use crate::storage::resume_object_key;

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume: ResumeRow,
    pub result: AnalyzeResponse,
    pub analysis: Analysis,
}

#[derive(Debug, Serialize)]
pub struct ReanalyzeResponse {
    pub result: AnalyzeResponse,
    pub analysis: Analysis,
}

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(input): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Resume title is required".to_string()));
    }

    let resume = state
        .resumes
        .create(NewResume {
            user_id: principal.id,
            title: title.to_string(),
            content: input.content,
            file_url: input.file_url,
        })
        .await?;

    info!(user_id = %principal.id, resume_id = %resume.id, "Resume created");
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<ResumeWithAnalysis>>, AppError> {
    Ok(Json(load_resumes_with_analyses(&state, principal.id).await?))
}

/// POST /api/v1/resumes/upload
///
/// Gate, extract, and score the file, then store it together with the
/// extracted text and the analysis.
pub async fn handle_upload(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let form = read_upload_form(multipart).await?;
    let upload = form.upload;

    let text = extract_text(state.extractor.clone(), &upload).await?;
    let report = evaluate(&text);

    let key = resume_object_key(principal.id, upload.kind);
    let file_url = state
        .files
        .put(&key, upload.bytes.clone(), upload.kind.mime())
        .await?;

    let title = form.title.unwrap_or_else(|| title_from_file_name(&upload.file_name));
    let created = state
        .resumes
        .create(NewResume {
            user_id: principal.id,
            title,
            content: text,
            file_url: Some(file_url),
        })
        .await;
    let resume = match created {
        Ok(resume) => resume,
        Err(err) => {
            warn!(key = %key, "Resume insert failed; removing uploaded file");
            if let Err(cleanup) = state.files.delete(&key).await {
                warn!(key = %key, error = %cleanup, "Uploaded file left orphaned");
            }
            return Err(err);
        }
    };

    let analysis = state
        .analyses
        .save(AnalysisSubject::Resume(resume.id), report.to_new_analysis())
        .await?;

    info!(
        user_id = %principal.id,
        resume_id = %resume.id,
        score = report.score,
        "Resume uploaded and analyzed"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            resume,
            result: AnalyzeResponse::from_report(report, state.config.low_score_threshold),
            analysis,
        }),
    ))
}

/// POST /api/v1/resumes/:id/analyze
pub async fn handle_reanalyze(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ReanalyzeResponse>, AppError> {
    let resume = find_owned_resume(&state, principal.id, id).await?;
    let report = evaluate(&resume.content);

    let analysis = state
        .analyses
        .save(AnalysisSubject::Resume(resume.id), report.to_new_analysis())
        .await?;

    info!(resume_id = %resume.id, score = report.score, "Resume re-analyzed");
    Ok(Json(ReanalyzeResponse {
        result: AnalyzeResponse::from_report(report, state.config.low_score_threshold),
        analysis,
    }))
}

/// GET /api/v1/resumes/:id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Analysis>, AppError> {
    let resume = find_owned_resume(&state, principal.id, id).await?;
    state
        .analyses
        .find_by_resume(resume.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No analysis for resume {id}")))
}

/// "Jane_Doe-CV.pdf" -> "Jane Doe CV"
fn title_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let title = stem
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if title.is_empty() {
        "Untitled resume".to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::repositories::ResumeRepository;

    use crate::analysis::upload::PDF_MIME;
    use crate::models::user::ROLE_USER;
    use crate::test_support::{body_json, get, multipart_request, post_json, TestApp};

    const RESUME_TEXT: &str = "Jane Doe\njane.doe@example.com\nSkills\nRust, SQL\nProjects\nA compiler\n";

    #[test]
    fn test_title_from_file_name() {
        assert_eq!(title_from_file_name("Jane_Doe-CV.pdf"), "Jane Doe CV");
        assert_eq!(title_from_file_name("resume"), "resume");
        assert_eq!(title_from_file_name(".pdf"), "Untitled resume");
    }

    #[tokio::test]
    async fn test_upload_stores_file_resume_and_analysis() {
        let app = TestApp::with_text(RESUME_TEXT);
        let user = app.seed_user("jane@example.com", "correct horse", ROLE_USER).await;
        let token = app.token_for(&user);

        let request = multipart_request(
            "/api/v1/resumes/upload",
            Some(&token),
            "resume",
            "Jane_Doe.pdf",
            PDF_MIME,
            b"%PDF-1.4 fake",
            Some("Backend roles"),
        );
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;

        assert_eq!(json["resume"]["title"], "Backend roles");
        assert_eq!(json["resume"]["content"], RESUME_TEXT);
        assert_eq!(json["analysis"]["score"], json["result"]["score"]);
        assert_eq!(json["analysis"]["subject"]["kind"], "resume");

        let stored = app.files.keys();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].starts_with(&format!("resumes/{}/", user.id)));
        assert!(stored[0].ends_with(".pdf"));
    }

    struct UnavailableResumes;

    #[async_trait]
    impl ResumeRepository for UnavailableResumes {
        async fn create(&self, _resume: NewResume) -> Result<ResumeRow, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("resumes table unavailable")))
        }

        async fn list_by_user(&self, _user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<ResumeRow>, AppError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_failed_insert_removes_uploaded_file() {
        let app = TestApp::with_resumes(RESUME_TEXT, Arc::new(UnavailableResumes));
        let user = app.seed_user("jane@example.com", "correct horse", ROLE_USER).await;
        let token = app.token_for(&user);

        let request = multipart_request(
            "/api/v1/resumes/upload",
            Some(&token),
            "resume",
            "cv.pdf",
            PDF_MIME,
            b"%PDF-1.4 fake",
            None,
        );
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.files.keys().is_empty());
        assert!(app.store.analyses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_requires_session() {
        let app = TestApp::with_text(RESUME_TEXT);
        let request = multipart_request(
            "/api/v1/resumes/upload",
            None,
            "resume",
            "cv.pdf",
            PDF_MIME,
            b"%PDF",
            None,
        );
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(app.files.keys().is_empty());
    }

    #[tokio::test]
    async fn test_reanalyze_replaces_previous_analysis() {
        let app = TestApp::new();
        let user = app.seed_user("jane@example.com", "correct horse", ROLE_USER).await;
        let token = app.token_for(&user);

        let response = app
            .send(post_json(
                "/api/v1/resumes",
                Some(&token),
                json!({ "title": "Main", "content": RESUME_TEXT }),
            ))
            .await;
        let resume_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/resumes/{resume_id}/analyze");
        for _ in 0..2 {
            let response = app.send(post_json(&uri, Some(&token), json!({}))).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(app.store.analyses.lock().unwrap().len(), 1);

        let response = app
            .send(get(&format!("/api/v1/resumes/{resume_id}/analysis"), Some(&token)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let score = json["score"].as_u64().unwrap();
        assert_eq!(score % 10, 0);
        assert_eq!(
            json["strengths"].as_array().unwrap().len() as u64,
            score / 10
        );
    }

    #[tokio::test]
    async fn test_other_users_resume_is_not_found() {
        let app = TestApp::new();
        let owner = app.seed_user("owner@example.com", "correct horse", ROLE_USER).await;
        let other = app.seed_user("other@example.com", "correct horse", ROLE_USER).await;

        let response = app
            .send(post_json(
                "/api/v1/resumes",
                Some(&app.token_for(&owner)),
                json!({ "title": "Main", "content": RESUME_TEXT }),
            ))
            .await;
        let resume_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .send(get(
                &format!("/api/v1/resumes/{resume_id}/analysis"),
                Some(&app.token_for(&other)),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let app = TestApp::new();
        let user = app.seed_user("jane@example.com", "correct horse", ROLE_USER).await;
        let response = app
            .send(post_json(
                "/api/v1/resumes",
                Some(&app.token_for(&user)),
                json!({ "title": "  ", "content": RESUME_TEXT }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
