//! Persistence seams. Handlers and services only see these traits; `AppState`
//! carries an `Arc<dyn Store>` built once at startup.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::history::{ApplicationStatus, CoverLetterRow, JobHistoryRow};
use crate::models::resume::ResumeRow;
use crate::models::user::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>>;
    async fn insert_user(&self, user: &User) -> Result<()>;
    /// Persists every mutable profile column of `user`.
    async fn update_user(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>>;
    async fn find_resume_for_user(&self, user_id: Uuid) -> Result<Option<ResumeRow>>;
    async fn insert_resume(&self, resume: &ResumeRow) -> Result<()>;
    async fn delete_resume(&self, id: Uuid) -> Result<()>;
}

/// Fields written when a cover letter is generated for a job URL.
#[derive(Debug, Clone)]
pub struct HistoryUpsert {
    pub user_id: Uuid,
    pub url: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub tone: String,
}

#[derive(Debug, Clone)]
pub struct NewCoverLetter {
    pub history_id: Uuid,
    pub user_id: Uuid,
    pub markdown: String,
    pub tone: String,
    pub user_prompt: String,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Inserts or updates the entry keyed by (user_id, url). Status and
    /// created_at of an existing entry are preserved.
    async fn upsert_history(&self, entry: HistoryUpsert) -> Result<JobHistoryRow>;
    /// Newest first.
    async fn list_history(&self, user_id: Uuid) -> Result<Vec<JobHistoryRow>>;
    /// Returns false when no entry with that id belongs to the user.
    async fn update_history_status(
        &self,
        user_id: Uuid,
        history_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool>;
    /// Appends a letter with version = previous max + 1 (1 for the first).
    async fn append_cover_letter(&self, letter: NewCoverLetter) -> Result<CoverLetterRow>;
    /// Ordered by version ascending.
    async fn list_cover_letters(
        &self,
        user_id: Uuid,
        history_id: Uuid,
    ) -> Result<Vec<CoverLetterRow>>;
}

#[async_trait]
pub trait Store: UserStore + ResumeStore + HistoryStore {
    async fn ping(&self) -> bool;
    async fn close(&self);
}
