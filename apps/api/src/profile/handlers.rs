//! Axum route handlers for the Profile API.

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::user::ProfileUpdate;
use crate::profile::{load_profile, update_profile, UserProfile};
use crate::resume::storage::{delete_resume, download_resume, replace_resume};
use crate::routes::upload::read_upload_form;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileMessageResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = load_profile(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(ProfileResponse { user }))
}

/// POST /api/profile
///
/// Updates name, location and personal prompt. Unknown fields are ignored.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileMessageResponse>, AppError> {
    let user = update_profile(state.store.as_ref(), auth.user_id, update).await?;
    Ok(Json(ProfileMessageResponse {
        message: "Profile updated successfully",
        user,
    }))
}

/// POST /api/profile/resume
///
/// Multipart upload (field `file`). Replaces any existing resume.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProfileMessageResponse>), AppError> {
    let file = read_upload_form(multipart)
        .await?
        .file
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    replace_resume(
        state.store.as_ref(),
        state.blobs.as_ref(),
        state.config.mime_detection,
        auth.user_id,
        file.bytes,
        &file.file_name,
        file.content_type.as_deref(),
    )
    .await?;

    let user = load_profile(state.store.as_ref(), auth.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProfileMessageResponse {
            message: "Resume uploaded successfully",
            user,
        }),
    ))
}

/// GET /api/profile/resume
///
/// Streams back the stored file as an attachment.
pub async fn handle_download_resume(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let (resume, blob) =
        download_resume(state.store.as_ref(), state.blobs.as_ref(), auth.user_id).await?;

    let disposition = format!("attachment; filename=\"{}\"", resume.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, resume.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        blob.bytes,
    )
        .into_response())
}

/// DELETE /api/profile/resume
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileMessageResponse>, AppError> {
    delete_resume(state.store.as_ref(), state.blobs.as_ref(), auth.user_id).await?;

    let user = load_profile(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(ProfileMessageResponse {
        message: "Resume deleted successfully",
        user,
    }))
}
