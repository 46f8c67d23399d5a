//! Google Drive upload of generated cover letters, using the user's own
//! Google access token (drive.file scope).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::errors::AppError;

pub mod handlers;

const GOOGLE_DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const DRIVE_TIMEOUT: Duration = Duration::from_secs(30);
const DRIVE_SERVICE: &str = "Google Drive";

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Drive upload failed (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<DriveError> for AppError {
    fn from(e: DriveError) -> Self {
        match &e {
            DriveError::Http(inner) if inner.is_timeout() || inner.is_connect() => {
                AppError::retryable(DRIVE_SERVICE, e.to_string())
            }
            _ => AppError::upstream(DRIVE_SERVICE, e.to_string()),
        }
    }
}

/// Metadata of the created Drive file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub web_content_link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DriveUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub folder_id: Option<String>,
}

#[async_trait]
pub trait DriveUploader: Send + Sync {
    async fn upload(&self, access_token: &str, upload: DriveUpload)
        -> Result<DriveFile, DriveError>;
}

#[derive(Clone)]
pub struct GoogleDriveClient {
    client: Client,
}

impl GoogleDriveClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(DRIVE_TIMEOUT)
                .build()
                .context("Failed to build Google Drive HTTP client")?,
        })
    }
}

fn upload_metadata(upload: &DriveUpload) -> serde_json::Value {
    match &upload.folder_id {
        Some(folder) => json!({ "name": upload.file_name, "parents": [folder] }),
        None => json!({ "name": upload.file_name }),
    }
}

#[async_trait]
impl DriveUploader for GoogleDriveClient {
    async fn upload(
        &self,
        access_token: &str,
        upload: DriveUpload,
    ) -> Result<DriveFile, DriveError> {
        let metadata = Part::text(upload_metadata(&upload).to_string())
            .mime_str("application/json; charset=UTF-8")?;
        let file = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new().part("metadata", metadata).part("file", file);

        let response = self
            .client
            .post(GOOGLE_DRIVE_UPLOAD_URL)
            .bearer_auth(access_token)
            .query(&[
                ("uploadType", "multipart"),
                ("fields", "id,name,webViewLink,webContentLink"),
            ])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<DriveFile>().await?)
    }
}
