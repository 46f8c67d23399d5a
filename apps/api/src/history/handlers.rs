//! Axum route handlers for the History API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::history::export::{history_to_csv, EXPORT_FILE_NAME};
use crate::models::history::{ApplicationStatus, CoverLetterRow, JobHistoryRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub status: String,
    pub tone: String,
    pub created_at: DateTime<Utc>,
}

impl From<JobHistoryRow> for HistoryItem {
    fn from(row: JobHistoryRow) -> Self {
        Self {
            id: row.id,
            job_title: row.job_title,
            company_name: row.company_name,
            location: row.location,
            url: row.url,
            source: row.source,
            status: row.status,
            tone: row.tone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterItem {
    pub id: Uuid,
    pub version: i32,
    pub markdown: String,
    pub tone: String,
    pub user_prompt: String,
    pub created_at: DateTime<Utc>,
}

impl From<CoverLetterRow> for LetterItem {
    fn from(row: CoverLetterRow) -> Self {
        Self {
            id: row.id,
            version: row.version,
            markdown: row.markdown,
            tone: row.tone,
            user_prompt: row.user_prompt,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct LettersResponse {
    pub letters: Vec<LetterItem>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: ApplicationStatus,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/history
///
/// The user's job history, newest first.
pub async fn handle_list_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<HistoryResponse>, AppError> {
    let rows = state.store.list_history(auth.user_id).await?;
    Ok(Json(HistoryResponse {
        history: rows.into_iter().map(HistoryItem::from).collect(),
    }))
}

/// GET /api/history/:id/letters
///
/// Every generated version for one job, oldest first.
pub async fn handle_list_letters(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(history_id): Path<Uuid>,
) -> Result<Json<LettersResponse>, AppError> {
    let owned = state
        .store
        .list_history(auth.user_id)
        .await?
        .iter()
        .any(|h| h.id == history_id);
    if !owned {
        return Err(AppError::NotFound("History item not found".to_string()));
    }

    let letters = state
        .store
        .list_cover_letters(auth.user_id, history_id)
        .await?;
    Ok(Json(LettersResponse {
        letters: letters.into_iter().map(LetterItem::from).collect(),
    }))
}

/// PATCH /api/history/:id/status
///
/// Accepts `Applied` or `Not Applied`.
pub async fn handle_update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(history_id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let status: ApplicationStatus = request
        .status
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(AppError::Validation)?;

    let updated = state
        .store
        .update_history_status(auth.user_id, history_id, status)
        .await?;
    if !updated {
        return Err(AppError::NotFound("History item not found".to_string()));
    }

    Ok(Json(StatusResponse {
        id: history_id,
        status,
    }))
}

/// GET /api/history/export
///
/// The whole history as a CSV attachment.
pub async fn handle_export_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Response, AppError> {
    let rows = state.store.list_history(auth.user_id).await?;
    let csv = history_to_csv(&rows);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
