// Data access: one async trait per entity, each backed by PostgreSQL.
// Handlers reach storage only through the trait objects held in AppState.

pub mod analyses;
pub mod linkedin;
#[cfg(test)]
pub mod memory;
pub mod resumes;
pub mod subscriptions;
pub mod templates;
pub mod users;

pub use analyses::{AnalysisRepository, PgAnalysisRepository};
pub use linkedin::{LinkedInRepository, PgLinkedInRepository};
pub use resumes::{PgResumeRepository, ResumeRepository};
pub use subscriptions::{PgSubscriptionRepository, SubscriptionRepository};
pub use templates::{PgTemplateRepository, TemplateRepository};
pub use users::{PgUserRepository, UserRepository};
