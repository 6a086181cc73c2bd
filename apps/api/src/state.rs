use std::sync::Arc;

use crate::analysis::extract::TextExtractor;
use crate::config::Config;
use crate::repositories::{
    AnalysisRepository, LinkedInRepository, ResumeRepository, SubscriptionRepository,
    TemplateRepository, UserRepository,
};
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub resumes: Arc<dyn ResumeRepository>,
    pub analyses: Arc<dyn AnalysisRepository>,
    pub linkedin: Arc<dyn LinkedInRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    /// Resume file storage. S3 in production.
    pub files: Arc<dyn FileStore>,
    pub extractor: Arc<dyn TextExtractor>,
    pub config: Config,
}
