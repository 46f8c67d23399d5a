//! Resume storage: one current resume per user, file bytes in blob storage and
//! extracted text alongside the metadata record.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::blob::{Blob, BlobError, BlobStore};
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::models::user::User;
use crate::profile::attention::refresh_attention;
use crate::resume::extract::extract_text;
use crate::resume::mime::{validate_extracted, validate_upload, MimeDetection};
use crate::store::Store;

const BLOB_SERVICE: &str = "blob storage";

/// Timeouts are worth retrying; other storage failures are not.
fn blob_failure(context: &str, err: BlobError) -> AppError {
    match err {
        BlobError::Timeout(_) => AppError::retryable(BLOB_SERVICE, format!("{context}: {err}")),
        other => AppError::upstream(BLOB_SERVICE, format!("{context}: {other}")),
    }
}

/// Final path component with anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn safe_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

pub fn blob_key(user_id: Uuid, file_name: &str) -> String {
    format!("resumes/{user_id}/{}-{file_name}", Uuid::new_v4())
}

async fn load_user(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Removes the resume's blob (best effort) and its record, and detaches it
/// from the user.
async fn remove_resume(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    user: &mut User,
    resume: &ResumeRow,
) -> Result<(), AppError> {
    if let Err(e) = blobs.delete(&resume.blob_key).await {
        warn!(
            "Could not delete blob '{}' of resume {}: {e}",
            resume.blob_key, resume.id
        );
    }
    store.delete_resume(resume.id).await?;

    user.latest_resume_id = None;
    refresh_attention(user);
    store.update_user(user).await?;
    Ok(())
}

/// Validates, extracts and stores a new resume, replacing any existing one.
///
/// The old resume is removed before the new blob is written, so a failure
/// part-way leaves the user without a resume rather than with two.
pub async fn replace_resume(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    detection: MimeDetection,
    user_id: Uuid,
    bytes: Vec<u8>,
    file_name: &str,
    declared_mime: Option<&str>,
) -> Result<ResumeRow, AppError> {
    let file_name = safe_file_name(file_name);
    let content_type = validate_upload(detection, &bytes, &file_name, declared_mime)?;

    // CPU-bound parsing runs off the async executor.
    let name = file_name.clone();
    let (bytes, resume_text) = tokio::task::spawn_blocking(move || {
        let text = extract_text(&bytes, &name);
        (bytes, text)
    })
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
    })?;

    validate_extracted(&file_name, &resume_text)?;

    let mut user = load_user(store, user_id).await?;

    if let Some(existing) = store.find_resume_for_user(user_id).await? {
        remove_resume(store, blobs, &mut user, &existing).await?;
    }

    let key = blob_key(user_id, &file_name);
    blobs
        .put(&key, bytes, &content_type)
        .await
        .map_err(|e| blob_failure("Failed to store resume", e))?;

    let resume = ResumeRow {
        id: Uuid::new_v4(),
        user_id,
        file_name,
        resume_text,
        blob_key: key,
        content_type,
        created_at: Utc::now(),
    };
    store.insert_resume(&resume).await?;

    user.latest_resume_id = Some(resume.id);
    refresh_attention(&mut user);
    store.update_user(&user).await?;

    info!(
        "Stored resume {} ('{}') for user {}",
        resume.id, resume.file_name, user_id
    );
    Ok(resume)
}

pub async fn delete_resume(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    user_id: Uuid,
) -> Result<(), AppError> {
    let mut user = load_user(store, user_id).await?;
    let resume = store
        .find_resume_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No resume to delete".to_string()))?;

    remove_resume(store, blobs, &mut user, &resume).await?;
    info!("Deleted resume {} for user {}", resume.id, user_id);
    Ok(())
}

/// The stored file of the user's current resume.
pub async fn download_resume(
    store: &dyn Store,
    blobs: &dyn BlobStore,
    user_id: Uuid,
) -> Result<(ResumeRow, Blob), AppError> {
    let resume = store
        .find_resume_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No resume found".to_string()))?;

    let blob = blobs.get(&resume.blob_key).await.map_err(|e| match e {
        BlobError::NotFound(_) => AppError::NotFound("Resume file not found".to_string()),
        other => blob_failure("Failed to fetch resume", other),
    })?;

    Ok((resume, blob))
}

/// The resume referenced by `users.latest_resume_id`, if any.
pub async fn current_resume(
    store: &dyn Store,
    user: &User,
) -> Result<Option<ResumeRow>, AppError> {
    match user.latest_resume_id {
        Some(id) => Ok(store.find_resume(id).await?),
        None => Ok(None),
    }
}
