//! Axum route handlers for the Drive API.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::auth::AuthError;
use crate::drive::{DriveFile, DriveUpload};
use crate::errors::AppError;
use crate::routes::upload::read_upload_form;
use crate::state::AppState;

pub const GOOGLE_TOKEN_HEADER: &str = "x-google-token";
pub const DEFAULT_FILE_NAME: &str = "CoverLetter.doc";
pub const DEFAULT_MIME_TYPE: &str = "application/msword";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DriveUploadResponse {
    pub success: bool,
    pub file: DriveFile,
}

/// Name for an upload that arrived without one: `CoverLetter - Acme - Engineer.doc`
/// when the job is known, `CoverLetter.doc` otherwise.
pub fn default_file_name(fields: &HashMap<String, String>) -> String {
    let parts: Vec<&str> = ["companyName", "jobTitle"]
        .iter()
        .filter_map(|key| fields.get(*key))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if parts.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        format!("CoverLetter - {}.doc", parts.join(" - "))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/drive/cover-letter
///
/// Saves a generated letter to the caller's Google Drive. Needs the session
/// token plus the user's Google access token in `X-Google-Token`.
pub async fn handle_save_to_drive(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<DriveUploadResponse>, AppError> {
    let google_token = headers
        .get(GOOGLE_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::GoogleTokenMissing)?
        .to_string();

    let (file, fields) = read_upload_form(multipart).await?.require_file()?;

    let file_name = match file.file_name.trim() {
        "" => default_file_name(&fields),
        name => name.to_string(),
    };
    let mime_type = file
        .content_type
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

    let drive_file = state
        .drive
        .upload(
            &google_token,
            DriveUpload {
                file_name,
                mime_type,
                bytes: file.bytes,
                folder_id: None,
            },
        )
        .await?;

    info!(
        "Saved '{}' to Google Drive for user {} (file {})",
        drive_file.name, auth.user_id, drive_file.id
    );

    Ok(Json(DriveUploadResponse {
        success: true,
        file: drive_file,
    }))
}
