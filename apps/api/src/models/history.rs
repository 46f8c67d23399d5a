use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Whether the user has applied to a job they generated a letter for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    #[default]
    #[serde(rename = "Not Applied")]
    NotApplied,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::NotApplied => "Not Applied",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Applied" => Ok(ApplicationStatus::Applied),
            "Not Applied" => Ok(ApplicationStatus::NotApplied),
            other => Err(format!(
                "Invalid status '{other}'. Must be 'Applied' or 'Not Applied'."
            )),
        }
    }
}

/// One row per (user, job URL).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobHistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub status: String,
    pub tone: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only; `version` starts at 1 per history entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoverLetterRow {
    pub id: Uuid,
    pub history_id: Uuid,
    pub user_id: Uuid,
    pub markdown: String,
    pub tone: String,
    pub user_prompt: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}
