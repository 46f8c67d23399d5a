use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for a user's current resume. The file itself lives in blob storage
/// under `blob_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub resume_text: String,
    pub blob_key: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Resume view embedded in profile responses.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub file_name: String,
    pub text: String,
}

impl From<&ResumeRow> for ResumeSummary {
    fn from(row: &ResumeRow) -> Self {
        Self {
            id: row.id,
            file_name: row.file_name.clone(),
            text: row.resume_text.clone(),
        }
    }
}
