//! Cover letter generation pipeline.
//!
//! Flow: sanitize posting → load user and resume → validate inputs → tone →
//!       build prompt → AI call → clean response → record history.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::cover_letter::cleaner::clean_response;
use crate::cover_letter::job_cleaner::sanitize_and_extract_text;
use crate::cover_letter::prompts::{build_prompt, PromptInput, UserInfo};
use crate::cover_letter::tone::Tone;
use crate::cover_letter::validation::validate_inputs;
use crate::errors::AppError;
use crate::history::{record_generation, JobMeta};
use crate::llm_client::TextGenerator;
use crate::resume::storage::current_resume;
use crate::store::Store;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub job_description: Option<String>,
    pub url: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub tone: Option<String>,
    pub user_prompt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratedLetter {
    pub cover_letter: String,
    pub clean_job_description: String,
    pub tone: Tone,
    pub history_id: Option<Uuid>,
    pub version: Option<i32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// The profile's standing instructions followed by the per-request ones.
fn combined_instructions(personal_prompt: Option<&str>, user_prompt: Option<&str>) -> String {
    [personal_prompt, user_prompt]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generates a letter for the user and records it against the job URL.
/// `today` is the date written into the letter.
pub async fn generate_cover_letter(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    user_id: Uuid,
    request: CoverLetterRequest,
    today: NaiveDate,
) -> Result<GeneratedLetter, AppError> {
    let raw_job = request
        .job_description
        .ok_or_else(|| AppError::Validation("Missing jobDescription field".to_string()))?;
    let job_posting = sanitize_and_extract_text(&raw_job);

    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let resume = current_resume(store, &user).await?.ok_or_else(|| {
        AppError::Validation(
            "No resume uploaded. Please upload your resume before generating a cover letter."
                .to_string(),
        )
    })?;

    let (valid, message) = validate_inputs(&job_posting, &resume.resume_text);
    if !valid {
        return Err(AppError::Validation(message));
    }

    let tone = match request.tone.as_deref().map(str::trim) {
        None | Some("") => Tone::default(),
        Some(value) => Tone::parse(value)?,
    };

    let user_prompt =
        combined_instructions(user.personal_prompt.as_deref(), request.user_prompt.as_deref());
    let user_info = UserInfo::from_profile(&user, &resume.resume_text);

    let prompt = build_prompt(&PromptInput {
        user_info: &user_info,
        job_posting: &job_posting,
        resume: &resume.resume_text,
        tone: tone.as_str(),
        user_prompt: &user_prompt,
        job_title: request.job_title.as_deref(),
        company_name: request.company_name.as_deref(),
        current_date: today,
    });

    info!(
        "Generating {} cover letter for user {} ({} chars of posting)",
        tone.as_str(),
        user_id,
        job_posting.chars().count()
    );
    let raw_letter = llm.generate(&prompt).await?;
    let cover_letter = clean_response(&raw_letter);

    let recorded = record_generation(
        store,
        user_id,
        JobMeta {
            url: request.url,
            job_title: request.job_title,
            company_name: request.company_name,
            location: request.location,
        },
        tone.as_str(),
        &user_prompt,
        &cover_letter,
    )
    .await?;

    Ok(GeneratedLetter {
        cover_letter,
        clean_job_description: job_posting,
        tone,
        history_id: recorded.as_ref().map(|r| r.history.id),
        version: recorded.as_ref().map(|r| r.letter.version),
    })
}
