//! Blob storage for uploaded resume files (S3 / MinIO).

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Error)]
pub enum BlobError {
    #[error("blob '{0}' not found")]
    NotFound(String),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("S3 {0} timed out")]
    Timeout(String),
}

/// Caps every S3 call, retries included, at `secs`.
pub fn s3_timeout_config(secs: u64) -> TimeoutConfig {
    TimeoutConfig::builder()
        .operation_timeout(Duration::from_secs(secs))
        .build()
}

fn sdk_failure<E, R>(action: &str, err: SdkError<E, R>) -> BlobError {
    match err {
        SdkError::TimeoutError(_) => BlobError::Timeout(action.to_string()),
        other => BlobError::S3(format!("{action} failed: {other}")),
    }
}

/// A stored object and the content type it was written with.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BlobError>;
    async fn get(&self, key: &str) -> Result<Blob, BlobError>;
    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BlobError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| sdk_failure("upload", e))?;

        info!("Uploaded blob to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Blob, BlobError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    BlobError::NotFound(key.to_string())
                } else {
                    sdk_failure("download", e)
                }
            })?;

        let content_type = output
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| BlobError::S3(format!("reading body failed: {e}")))?
            .into_bytes()
            .to_vec();

        Ok(Blob {
            bytes,
            content_type,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| sdk_failure("delete", e))?;

        info!("Deleted blob s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
