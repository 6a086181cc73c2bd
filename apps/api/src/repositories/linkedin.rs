use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::linkedin::{LinkedInProfileRow, LinkedInProfileUpdate, NewLinkedInProfile};

#[async_trait]
pub trait LinkedInRepository: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        profile: NewLinkedInProfile,
    ) -> Result<LinkedInProfileRow, AppError>;
    /// Returns `None` when the user has no profile.
    async fn update_by_user(
        &self,
        user_id: Uuid,
        update: LinkedInProfileUpdate,
    ) -> Result<Option<LinkedInProfileRow>, AppError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<LinkedInProfileRow>, AppError>;
}

pub struct PgLinkedInRepository {
    pool: PgPool,
}

impl PgLinkedInRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkedInRepository for PgLinkedInRepository {
    async fn create(
        &self,
        user_id: Uuid,
        profile: NewLinkedInProfile,
    ) -> Result<LinkedInProfileRow, AppError> {
        Ok(sqlx::query_as::<_, LinkedInProfileRow>(
            r#"
            INSERT INTO linkedin_profiles
                (id, user_id, profile_url, headline, summary, experience, education, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&profile.profile_url)
        .bind(&profile.headline)
        .bind(&profile.summary)
        .bind(&profile.experience)
        .bind(&profile.education)
        .bind(profile.skills.as_slice())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_by_user(
        &self,
        user_id: Uuid,
        update: LinkedInProfileUpdate,
    ) -> Result<Option<LinkedInProfileRow>, AppError> {
        Ok(sqlx::query_as::<_, LinkedInProfileRow>(
            r#"
            UPDATE linkedin_profiles SET
                headline   = COALESCE($2, headline),
                summary    = COALESCE($3, summary),
                experience = COALESCE($4, experience),
                education  = COALESCE($5, education),
                skills     = COALESCE($6, skills),
                updated_at = now()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&update.headline)
        .bind(&update.summary)
        .bind(&update.experience)
        .bind(&update.education)
        .bind(&update.skills)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<LinkedInProfileRow>, AppError> {
        Ok(sqlx::query_as::<_, LinkedInProfileRow>(
            "SELECT * FROM linkedin_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
