use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkedInProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_url: String,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLinkedInProfile {
    pub profile_url: String,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Partial update. `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedInProfileUpdate {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
    pub skills: Option<Vec<String>>,
}
