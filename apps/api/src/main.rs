mod analysis;
mod auth;
mod config;
mod db;
mod errors;
mod linkedin;
mod models;
mod repositories;
mod resumes;
mod routes;
mod state;
mod storage;
mod subscriptions;
mod templates;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::extract::DocumentExtractor;
use crate::config::Config;
use crate::db::create_pool;
use crate::repositories::{
    PgAnalysisRepository, PgLinkedInRepository, PgResumeRepository, PgSubscriptionRepository,
    PgTemplateRepository, PgUserRepository,
};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::S3FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let state = AppState {
        users: Arc::new(PgUserRepository::new(db.clone())),
        resumes: Arc::new(PgResumeRepository::new(db.clone())),
        analyses: Arc::new(PgAnalysisRepository::new(db.clone())),
        linkedin: Arc::new(PgLinkedInRepository::new(db.clone())),
        subscriptions: Arc::new(PgSubscriptionRepository::new(db.clone())),
        templates: Arc::new(PgTemplateRepository::new(db)),
        files: Arc::new(S3FileStore::new(s3, config.s3_bucket.clone())),
        extractor: Arc::new(DocumentExtractor),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web frontend's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
