//! Axum route handlers for the Cover Letter API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::cover_letter::generator::{generate_cover_letter, CoverLetterRequest};
use crate::cover_letter::tone::{supported_tones, Tone};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    pub clean_job_description: String,
    pub url: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub tone: Tone,
    pub history_id: Option<Uuid>,
    pub version: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct TonesResponse {
    pub tones: Vec<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/cover-letter
///
/// Generates a letter from the posting and the user's stored resume. When a
/// job URL is given the letter is saved as the next version for that job.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let url = request.url.clone();
    let job_title = request.job_title.clone();
    let company_name = request.company_name.clone();
    let location = request.location.clone();

    let letter = generate_cover_letter(
        state.store.as_ref(),
        state.llm.as_ref(),
        auth.user_id,
        request,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(CoverLetterResponse {
        cover_letter: letter.cover_letter,
        clean_job_description: letter.clean_job_description,
        url,
        job_title,
        company_name,
        location,
        tone: letter.tone,
        history_id: letter.history_id,
        version: letter.version,
    }))
}

/// GET /api/cover-letter/tones
pub async fn handle_list_tones() -> Json<TonesResponse> {
    Json(TonesResponse {
        tones: supported_tones(),
    })
}
