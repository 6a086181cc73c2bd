use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::subscription::{SubscriptionRow, SubscriptionStatus};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// New subscriptions always start `active`.
    async fn create(
        &self,
        user_id: Uuid,
        plan: &str,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<SubscriptionRow, AppError>;
    /// `end_date` of `None` keeps the stored end date.
    async fn update_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Option<SubscriptionRow>, AppError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionRow>, AppError>;
}

pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(
        &self,
        user_id: Uuid,
        plan: &str,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<SubscriptionRow, AppError> {
        Ok(sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions (id, user_id, plan, status, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(plan)
        .bind(SubscriptionStatus::Active.as_str())
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Option<SubscriptionRow>, AppError> {
        Ok(sqlx::query_as::<_, SubscriptionRow>(
            r#"
            UPDATE subscriptions SET
                status     = $2,
                end_date   = COALESCE($3, end_date),
                updated_at = now()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(status.as_str())
        .bind(end_date)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionRow>, AppError> {
        Ok(sqlx::query_as::<_, SubscriptionRow>(
            "SELECT * FROM subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
