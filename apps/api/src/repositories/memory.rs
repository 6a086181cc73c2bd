//! In-memory implementations of every repository trait, used by handler
//! tests in place of PostgreSQL. Tables are plain vectors behind a mutex so
//! tests can inspect what a handler wrote.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{Analysis, AnalysisSubject, NewAnalysis};
use crate::models::linkedin::{LinkedInProfileRow, LinkedInProfileUpdate, NewLinkedInProfile};
use crate::models::resume::{NewResume, ResumeRow};
use crate::models::subscription::{SubscriptionRow, SubscriptionStatus};
use crate::models::template::{
    NewTemplate, NewTemplateDownload, Template, TemplateCategory, TemplateDownload,
};
use crate::models::user::{NewUser, User};
use crate::repositories::{
    AnalysisRepository, LinkedInRepository, ResumeRepository, SubscriptionRepository,
    TemplateRepository, UserRepository,
};

#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<User>>,
    pub resumes: Mutex<Vec<ResumeRow>>,
    pub analyses: Mutex<Vec<Analysis>>,
    pub linkedin: Mutex<Vec<LinkedInProfileRow>>,
    pub subscriptions: Mutex<Vec<SubscriptionRow>>,
    pub templates: Mutex<Vec<Template>>,
    pub categories: Mutex<Vec<TemplateCategory>>,
    pub downloads: Mutex<Vec<TemplateDownload>>,
}

impl MemoryStore {
    pub fn downloads(&self) -> Vec<TemplateDownload> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ResumeRepository for MemoryStore {
    async fn create(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let now = Utc::now();
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            title: resume.title,
            content: resume.content,
            file_url: resume.file_url,
            created_at: now,
            updated_at: now,
        };
        self.resumes.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
        let resumes = self.resumes.lock().unwrap();
        // Insertion order is creation order; newest first.
        Ok(resumes
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        let resumes = self.resumes.lock().unwrap();
        Ok(resumes.iter().find(|r| r.id == id).cloned())
    }
}

#[async_trait]
impl AnalysisRepository for MemoryStore {
    async fn save(
        &self,
        subject: AnalysisSubject,
        analysis: NewAnalysis,
    ) -> Result<Analysis, AppError> {
        let mut analyses = self.analyses.lock().unwrap();
        analyses.retain(|a| a.subject != subject);
        let row = Analysis {
            id: Uuid::new_v4(),
            subject,
            score: analysis.score.min(100),
            strengths: analysis.strengths,
            weaknesses: analysis.weaknesses,
            recommendations: analysis.recommendations,
            created_at: Utc::now(),
        };
        analyses.push(row.clone());
        Ok(row)
    }

    async fn find_by_resume(&self, resume_id: Uuid) -> Result<Option<Analysis>, AppError> {
        let analyses = self.analyses.lock().unwrap();
        Ok(analyses
            .iter()
            .find(|a| a.subject == AnalysisSubject::Resume(resume_id))
            .cloned())
    }

    async fn find_by_linkedin_profile(
        &self,
        linkedin_profile_id: Uuid,
    ) -> Result<Option<Analysis>, AppError> {
        let analyses = self.analyses.lock().unwrap();
        Ok(analyses
            .iter()
            .find(|a| a.subject == AnalysisSubject::LinkedInProfile(linkedin_profile_id))
            .cloned())
    }
}

#[async_trait]
impl LinkedInRepository for MemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        profile: NewLinkedInProfile,
    ) -> Result<LinkedInProfileRow, AppError> {
        let mut profiles = self.linkedin.lock().unwrap();
        if profiles.iter().any(|p| p.user_id == user_id) {
            return Err(AppError::Conflict("LinkedIn profile already exists".to_string()));
        }
        let now = Utc::now();
        let row = LinkedInProfileRow {
            id: Uuid::new_v4(),
            user_id,
            profile_url: profile.profile_url,
            headline: profile.headline,
            summary: profile.summary,
            experience: profile.experience,
            education: profile.education,
            skills: profile.skills,
            created_at: now,
            updated_at: now,
        };
        profiles.push(row.clone());
        Ok(row)
    }

    async fn update_by_user(
        &self,
        user_id: Uuid,
        update: LinkedInProfileUpdate,
    ) -> Result<Option<LinkedInProfileRow>, AppError> {
        let mut profiles = self.linkedin.lock().unwrap();
        let Some(row) = profiles.iter_mut().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        if update.headline.is_some() {
            row.headline = update.headline;
        }
        if update.summary.is_some() {
            row.summary = update.summary;
        }
        if update.experience.is_some() {
            row.experience = update.experience;
        }
        if update.education.is_some() {
            row.education = update.education;
        }
        if let Some(skills) = update.skills {
            row.skills = skills;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<LinkedInProfileRow>, AppError> {
        let profiles = self.linkedin.lock().unwrap();
        Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        plan: &str,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<SubscriptionRow, AppError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        if subscriptions.iter().any(|s| s.user_id == user_id) {
            return Err(AppError::Conflict("Subscription already exists".to_string()));
        }
        let now = Utc::now();
        let row = SubscriptionRow {
            id: Uuid::new_v4(),
            user_id,
            plan: plan.to_string(),
            status: SubscriptionStatus::Active.to_string(),
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        };
        subscriptions.push(row.clone());
        Ok(row)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Option<SubscriptionRow>, AppError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let Some(row) = subscriptions.iter_mut().find(|s| s.user_id == user_id) else {
            return Ok(None);
        };
        row.status = status.to_string();
        if end_date.is_some() {
            row.end_date = end_date;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<SubscriptionRow>, AppError> {
        let subscriptions = self.subscriptions.lock().unwrap();
        Ok(subscriptions.iter().find(|s| s.user_id == user_id).cloned())
    }
}

#[async_trait]
impl TemplateRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Template>, AppError> {
        let templates = self.templates.lock().unwrap();
        Ok(templates.iter().rev().cloned().collect())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Template>, AppError> {
        let templates = self.templates.lock().unwrap();
        Ok(templates
            .iter()
            .rev()
            .filter(|t| t.category == category)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Template>, AppError> {
        let templates = self.templates.lock().unwrap();
        Ok(templates.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, template: NewTemplate) -> Result<Template, AppError> {
        {
            let mut categories = self.categories.lock().unwrap();
            if !categories.iter().any(|c| c.name == template.category) {
                let id = categories.len() as i64 + 1;
                categories.push(TemplateCategory {
                    id,
                    name: template.category.clone(),
                    description: None,
                });
            }
        }

        let mut templates = self.templates.lock().unwrap();
        let now = Utc::now();
        let row = Template {
            id: templates.len() as i64 + 1,
            name: template.name,
            category: template.category,
            description: template.description,
            image: template.image,
            preview_url: template.preview_url,
            is_premium: template.is_premium,
            features: template.features,
            created_at: now,
            updated_at: now,
        };
        templates.push(row.clone());
        Ok(row)
    }

    async fn list_categories(&self) -> Result<Vec<TemplateCategory>, AppError> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn record_download(
        &self,
        download: NewTemplateDownload,
    ) -> Result<TemplateDownload, AppError> {
        let mut downloads = self.downloads.lock().unwrap();
        let row = TemplateDownload {
            id: downloads.len() as i64 + 1,
            template_id: download.template_id,
            user_id: download.user_id,
            ip_address: download.ip_address,
            user_agent: download.user_agent,
            downloaded_at: Utc::now(),
        };
        downloads.push(row.clone());
        Ok(row)
    }

    async fn download_count(&self, template_id: i64) -> Result<i64, AppError> {
        let downloads = self.downloads.lock().unwrap();
        Ok(downloads
            .iter()
            .filter(|d| d.template_id == template_id)
            .count() as i64)
    }
}
