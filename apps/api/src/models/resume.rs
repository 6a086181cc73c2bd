use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::analysis::Analysis;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
}

/// A resume together with its analysis, if one has been run.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeWithAnalysis {
    #[serde(flatten)]
    pub resume: ResumeRow,
    pub analysis: Option<Analysis>,
}
