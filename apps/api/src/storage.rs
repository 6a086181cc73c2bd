use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::analysis::upload::DocumentKind;
use crate::errors::AppError;

/// Object storage for uploaded resume files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `bytes` under `key` and returns the location recorded on the resume.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct S3FileStore {
    client: S3Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        let location = format!("s3://{}/{}", self.bucket, key);
        info!("Uploaded resume file to {location}");
        Ok(location)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        info!("Deleted resume file s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// `resumes/<user id>/<random id>.<ext>`
pub fn resume_object_key(user_id: Uuid, kind: DocumentKind) -> String {
    format!("resumes/{}/{}.{}", user_id, Uuid::new_v4(), kind.extension())
}
