use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{Analysis, AnalysisRow, AnalysisSubject, NewAnalysis};

#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Stores the subject's analysis, replacing any previous one so each
    /// parent keeps at most one.
    async fn save(&self, subject: AnalysisSubject, analysis: NewAnalysis)
        -> Result<Analysis, AppError>;
    async fn find_by_resume(&self, resume_id: Uuid) -> Result<Option<Analysis>, AppError>;
    async fn find_by_linkedin_profile(
        &self,
        linkedin_profile_id: Uuid,
    ) -> Result<Option<Analysis>, AppError>;
}

pub struct PgAnalysisRepository {
    pool: PgPool,
}

impl PgAnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_parent(
        &self,
        column: &'static str,
        parent_id: Uuid,
    ) -> Result<Option<Analysis>, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>(&format!(
            "SELECT * FROM analyses WHERE {column} = $1"
        ))
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Analysis::try_from).transpose()?)
    }
}

fn parent_column(subject: &AnalysisSubject) -> (&'static str, Uuid) {
    match subject {
        AnalysisSubject::Resume(id) => ("resume_id", *id),
        AnalysisSubject::LinkedInProfile(id) => ("linkedin_profile_id", *id),
    }
}

#[async_trait]
impl AnalysisRepository for PgAnalysisRepository {
    async fn save(
        &self,
        subject: AnalysisSubject,
        analysis: NewAnalysis,
    ) -> Result<Analysis, AppError> {
        let (column, parent_id) = parent_column(&subject);
        let score = i32::try_from(analysis.score.min(100)).unwrap_or(100);

        let row = sqlx::query_as::<_, AnalysisRow>(&format!(
            r#"
            INSERT INTO analyses (id, {column}, score, strengths, weaknesses, recommendations)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT ({column}) DO UPDATE SET
                score = EXCLUDED.score,
                strengths = EXCLUDED.strengths,
                weaknesses = EXCLUDED.weaknesses,
                recommendations = EXCLUDED.recommendations,
                created_at = now()
            RETURNING *
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(parent_id)
        .bind(score)
        .bind(analysis.strengths.as_slice())
        .bind(analysis.weaknesses.as_slice())
        .bind(analysis.recommendations.as_slice())
        .fetch_one(&self.pool)
        .await?;

        Ok(Analysis::try_from(row)?)
    }

    async fn find_by_resume(&self, resume_id: Uuid) -> Result<Option<Analysis>, AppError> {
        self.find_by_parent("resume_id", resume_id).await
    }

    async fn find_by_linkedin_profile(
        &self,
        linkedin_profile_id: Uuid,
    ) -> Result<Option<Analysis>, AppError> {
        self.find_by_parent("linkedin_profile_id", linkedin_profile_id)
            .await
    }
}
