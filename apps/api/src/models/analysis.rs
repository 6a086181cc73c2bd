use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The single parent an analysis belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AnalysisSubject {
    Resume(Uuid),
    #[serde(rename = "linkedin_profile")]
    LinkedInProfile(Uuid),
}

impl AnalysisSubject {
    pub fn resume_id(&self) -> Option<Uuid> {
        match self {
            AnalysisSubject::Resume(id) => Some(*id),
            AnalysisSubject::LinkedInProfile(_) => None,
        }
    }

    pub fn linkedin_profile_id(&self) -> Option<Uuid> {
        match self {
            AnalysisSubject::Resume(_) => None,
            AnalysisSubject::LinkedInProfile(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub resume_id: Option<Uuid>,
    pub linkedin_profile_id: Option<Uuid>,
    pub score: i32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Typed analysis aggregate. The xor-parent columns collapse into `subject`.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub id: Uuid,
    pub subject: AnalysisSubject,
    pub score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AnalysisRow> for Analysis {
    type Error = anyhow::Error;

    fn try_from(row: AnalysisRow) -> Result<Self, Self::Error> {
        let subject = match (row.resume_id, row.linkedin_profile_id) {
            (Some(id), None) => AnalysisSubject::Resume(id),
            (None, Some(id)) => AnalysisSubject::LinkedInProfile(id),
            _ => anyhow::bail!("analysis {} does not have exactly one parent", row.id),
        };
        let score = u32::try_from(row.score)
            .ok()
            .filter(|s| *s <= 100)
            .ok_or_else(|| anyhow::anyhow!("analysis {} has out-of-range score {}", row.id, row.score))?;
        Ok(Analysis {
            id: row.id,
            subject,
            score,
            strengths: row.strengths,
            weaknesses: row.weaknesses,
            recommendations: row.recommendations,
            created_at: row.created_at,
        })
    }
}
