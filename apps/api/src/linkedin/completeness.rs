use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::analysis::NewAnalysis;
use crate::models::linkedin::LinkedInProfileRow;

/// A summary shorter than this reads as a stub.
const MIN_SUMMARY_WORDS: usize = 40;
const MIN_HEADLINE_WORDS: usize = 3;
const MIN_SKILLS: usize = 5;
const MIN_EXPERIENCE_ENTRIES: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Weak,
    Missing,
}

impl SectionStatus {
    fn score(&self) -> f64 {
        match self {
            SectionStatus::Strong => 1.0,
            SectionStatus::Weak => 0.5,
            SectionStatus::Missing => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Headline,
    Summary,
    Experience,
    Education,
    Skills,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Headline => "Headline",
            Section::Summary => "Summary",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
        }
    }

    fn recommendation(&self, status: SectionStatus) -> String {
        match (self, status) {
            (Section::Headline, SectionStatus::Missing) => {
                "Add a headline that states your role and specialty".to_string()
            }
            (Section::Headline, _) => format!(
                "Expand your headline to at least {MIN_HEADLINE_WORDS} words describing your role and focus"
            ),
            (Section::Summary, SectionStatus::Missing) => {
                "Write an About summary introducing your experience and goals".to_string()
            }
            (Section::Summary, _) => format!(
                "Grow your summary to at least {MIN_SUMMARY_WORDS} words with concrete achievements"
            ),
            (Section::Experience, SectionStatus::Missing) => {
                "List your work experience with role, company, and dates".to_string()
            }
            (Section::Experience, _) => {
                "Add more positions to your experience to show career progression".to_string()
            }
            (Section::Education, _) => "Add your education history".to_string(),
            (Section::Skills, SectionStatus::Missing) => {
                "Add the skills recruiters search for in your field".to_string()
            }
            (Section::Skills, _) => {
                format!("List at least {MIN_SKILLS} skills to improve search visibility")
            }
        }
    }
}

const SECTION_WEIGHTS: &[(Section, f64)] = &[
    (Section::Headline, 0.15),
    (Section::Summary, 0.25),
    (Section::Experience, 0.30),
    (Section::Education, 0.15),
    (Section::Skills, 0.15),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: Section,
    pub score: f64,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Weighted completeness as a percentage.
    pub score: u32,
    pub sections: Vec<SectionHealth>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ProfileReport {
    pub fn to_new_analysis(&self) -> NewAnalysis {
        NewAnalysis {
            score: self.score,
            strengths: self.strengths.clone(),
            weaknesses: self.weaknesses.clone(),
            recommendations: self.recommendations.clone(),
        }
    }
}

pub fn analyze_profile(profile: &LinkedInProfileRow) -> ProfileReport {
    let mut sections = Vec::new();
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();
    let mut weighted_score_sum = 0.0;

    for (section, weight) in SECTION_WEIGHTS {
        let status = match section {
            Section::Headline => text_status(profile.headline.as_deref(), MIN_HEADLINE_WORDS),
            Section::Summary => text_status(profile.summary.as_deref(), MIN_SUMMARY_WORDS),
            Section::Experience => {
                count_status(entry_count(profile.experience.as_ref()), MIN_EXPERIENCE_ENTRIES)
            }
            Section::Education => count_status(entry_count(profile.education.as_ref()), 1),
            Section::Skills => {
                let skills = profile.skills.iter().filter(|s| !s.trim().is_empty()).count();
                count_status(skills, MIN_SKILLS)
            }
        };

        if status == SectionStatus::Strong {
            strengths.push(section.label().to_string());
        } else {
            weaknesses.push(section.label().to_string());
            recommendations.push(section.recommendation(status));
        }

        weighted_score_sum += status.score() * weight;
        sections.push(SectionHealth {
            section: *section,
            score: status.score(),
            status,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let score = ((weighted_score_sum / total_weight).clamp(0.0, 1.0) * 100.0).round() as u32;

    ProfileReport {
        score,
        sections,
        strengths,
        weaknesses,
        recommendations,
    }
}

fn text_status(text: Option<&str>, strong_words: usize) -> SectionStatus {
    match text.map(|t| t.split_whitespace().count()).unwrap_or(0) {
        0 => SectionStatus::Missing,
        n if n >= strong_words => SectionStatus::Strong,
        _ => SectionStatus::Weak,
    }
}

fn count_status(count: usize, strong_count: usize) -> SectionStatus {
    match count {
        0 => SectionStatus::Missing,
        n if n >= strong_count => SectionStatus::Strong,
        _ => SectionStatus::Weak,
    }
}

/// Experience and education arrive either as JSON arrays or as a JSON
/// string holding an encoded array. Any other non-empty value counts once.
fn entry_count(value: Option<&Value>) -> usize {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Array(items)) => items.iter().filter(|v| !is_blank(v)).count(),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items.iter().filter(|v| !is_blank(v)).count(),
            Ok(Value::String(_)) | Err(_) => usize::from(!raw.trim().is_empty()),
            Ok(other) => usize::from(!is_blank(&other)),
        },
        Some(other) => usize::from(!is_blank(other)),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}
