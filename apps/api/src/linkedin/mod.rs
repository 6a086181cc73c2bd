// LinkedIn profile: one per user, CRUD plus a weighted section-completeness analysis.

pub mod completeness;
pub mod handlers;
