use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::template::{
    NewTemplate, NewTemplateDownload, Template, TemplateCategory, TemplateDownload,
};

#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<Template>, AppError>;
    async fn list_by_category(&self, category: &str) -> Result<Vec<Template>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Template>, AppError>;
    /// Also registers the category if it is new.
    async fn create(&self, template: NewTemplate) -> Result<Template, AppError>;
    /// Alphabetical.
    async fn list_categories(&self) -> Result<Vec<TemplateCategory>, AppError>;
    async fn record_download(
        &self,
        download: NewTemplateDownload,
    ) -> Result<TemplateDownload, AppError>;
    async fn download_count(&self, template_id: i64) -> Result<i64, AppError>;
}

pub struct PgTemplateRepository {
    pool: PgPool,
}

impl PgTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PgTemplateRepository {
    async fn list(&self) -> Result<Vec<Template>, AppError> {
        Ok(
            sqlx::query_as::<_, Template>("SELECT * FROM templates ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Template>, AppError> {
        Ok(sqlx::query_as::<_, Template>(
            "SELECT * FROM templates WHERE category = $1 ORDER BY created_at DESC",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Template>, AppError> {
        Ok(
            sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create(&self, template: NewTemplate) -> Result<Template, AppError> {
        sqlx::query("INSERT INTO template_categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(&template.category)
            .execute(&self.pool)
            .await?;

        Ok(sqlx::query_as::<_, Template>(
            r#"
            INSERT INTO templates
                (name, category, description, image, preview_url, is_premium, features)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&template.name)
        .bind(&template.category)
        .bind(&template.description)
        .bind(&template.image)
        .bind(&template.preview_url)
        .bind(template.is_premium)
        .bind(template.features.as_slice())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_categories(&self) -> Result<Vec<TemplateCategory>, AppError> {
        Ok(sqlx::query_as::<_, TemplateCategory>(
            "SELECT * FROM template_categories ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn record_download(
        &self,
        download: NewTemplateDownload,
    ) -> Result<TemplateDownload, AppError> {
        Ok(sqlx::query_as::<_, TemplateDownload>(
            r#"
            INSERT INTO template_downloads (template_id, user_id, ip_address, user_agent)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(download.template_id)
        .bind(download.user_id)
        .bind(&download.ip_address)
        .bind(&download.user_agent)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn download_count(&self, template_id: i64) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar(
            "SELECT COUNT(*) FROM template_downloads WHERE template_id = $1",
        )
        .bind(template_id)
        .fetch_one(&self.pool)
        .await?)
    }
}
