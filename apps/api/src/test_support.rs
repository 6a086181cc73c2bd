//! Test harness: the real router over in-memory repositories and file store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::analysis::extract::{DocumentExtractor, ExtractionError, TextExtractor};
use crate::analysis::upload::DocumentKind;
use crate::auth::jwt::{issue_session_token, JwtConfig};
use crate::auth::password::hash_password;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::template::{NewTemplate, Template};
use crate::models::user::{NewUser, Principal, User};
use crate::repositories::memory::MemoryStore;
use crate::repositories::{ResumeRepository, TemplateRepository, UserRepository};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStore;

const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        s3_bucket: "resumes-test".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-do-not-use".to_string(),
            max_age_secs: 3600,
        },
        low_score_threshold: 60,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

#[derive(Default)]
pub struct MemoryFileStore {
    objects: Mutex<Vec<(String, Bytes)>>,
}

impl MemoryFileStore {
    pub fn keys(&self) -> Vec<String> {
        let objects = self.objects.lock().unwrap();
        objects.iter().map(|(key, _)| key.clone()).collect()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn put(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<String, AppError> {
        self.objects.lock().unwrap().push((key.to_string(), bytes));
        Ok(format!("memory://{key}"))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().retain(|(stored, _)| stored != key);
        Ok(())
    }
}

/// Returns the same text for every document.
pub struct FixedTextExtractor(pub String);

impl TextExtractor for FixedTextExtractor {
    fn extract(&self, _kind: DocumentKind, _bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.0.clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub files: Arc<MemoryFileStore>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(DocumentExtractor))
    }

    /// Uploads extract to `text` regardless of their bytes.
    pub fn with_text(text: &str) -> Self {
        Self::with_extractor(Arc::new(FixedTextExtractor(text.to_string())))
    }

    /// Like [`TestApp::with_text`], with resume rows handled by `resumes`.
    pub fn with_resumes(text: &str, resumes: Arc<dyn ResumeRepository>) -> Self {
        Self::assemble(Arc::new(FixedTextExtractor(text.to_string())), Some(resumes))
    }

    fn with_extractor(extractor: Arc<dyn TextExtractor>) -> Self {
        Self::assemble(extractor, None)
    }

    fn assemble(
        extractor: Arc<dyn TextExtractor>,
        resumes: Option<Arc<dyn ResumeRepository>>,
    ) -> Self {
        let store = Arc::new(MemoryStore::default());
        let files = Arc::new(MemoryFileStore::default());
        let config = test_config();

        let state = AppState {
            users: store.clone(),
            resumes: resumes.unwrap_or_else(|| store.clone() as Arc<dyn ResumeRepository>),
            analyses: store.clone(),
            linkedin: store.clone(),
            subscriptions: store.clone(),
            templates: store.clone(),
            files: files.clone(),
            extractor,
            config: config.clone(),
        };

        TestApp {
            router: build_router(state),
            store,
            files,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn seed_user(&self, email: &str, password: &str, role: &str) -> User {
        UserRepository::create(
            self.store.as_ref(),
            NewUser {
                email: email.to_string(),
                name: Some("Test User".to_string()),
                password_hash: hash_password(password).unwrap(),
                role: role.to_string(),
            },
        )
        .await
        .unwrap()
    }

    pub async fn seed_template(&self, template: NewTemplate) -> Template {
        TemplateRepository::create(self.store.as_ref(), template)
            .await
            .unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        issue_session_token(&Principal::from(user), &self.config.jwt).unwrap()
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request("POST", uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn patch_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request("PATCH", uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A multipart form with one file field and an optional `title` field.
pub fn multipart_request(
    uri: &str,
    token: Option<&str>,
    field_name: &str,
    file_name: &str,
    content_type: &str,
    contents: &[u8],
    title: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(b"\r\n");
    if let Some(title) = title {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"title\"\r\n\r\n\
                 {title}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    request("POST", uri, token)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
