// Stored resumes: JSON create, multipart upload with scoring, re-analysis.
// Every route is scoped to the signed-in user; another user's resume reads as missing.

pub mod handlers;

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeWithAnalysis};
use crate::state::AppState;

/// The user's resumes, newest first, each paired with its analysis.
pub async fn load_resumes_with_analyses(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<ResumeWithAnalysis>, AppError> {
    let resumes = state.resumes.list_by_user(user_id).await?;
    let mut out = Vec::with_capacity(resumes.len());
    for resume in resumes {
        let analysis = state.analyses.find_by_resume(resume.id).await?;
        out.push(ResumeWithAnalysis { resume, analysis });
    }
    Ok(out)
}

pub async fn find_owned_resume(
    state: &AppState,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<ResumeRow, AppError> {
    state
        .resumes
        .find_by_id(resume_id)
        .await?
        .filter(|r| r.user_id == user_id)
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}
