//! Job application history: one entry per (user, job URL), each carrying the
//! versioned cover letters generated for that job.

use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::history::{CoverLetterRow, JobHistoryRow};
use crate::store::{HistoryUpsert, NewCoverLetter, Store};

pub mod export;
pub mod handlers;

/// Job details sent alongside a generation request.
#[derive(Debug, Clone, Default)]
pub struct JobMeta {
    pub url: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
}

/// A recorded generation: the history entry and the letter version appended to it.
#[derive(Debug, Clone)]
pub struct RecordedGeneration {
    pub history: JobHistoryRow,
    pub letter: CoverLetterRow,
}

/// Host of the job URL without a leading `www.`, e.g. `linkedin.com`.
pub fn derive_source(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    (!host.is_empty()).then(|| host.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Upserts the history entry for the job URL and appends a new letter version.
/// Returns `None` without touching the store when the request carried no URL.
pub async fn record_generation(
    store: &dyn Store,
    user_id: Uuid,
    meta: JobMeta,
    tone: &str,
    user_prompt: &str,
    markdown: &str,
) -> Result<Option<RecordedGeneration>, AppError> {
    let Some(url) = non_blank(meta.url) else {
        return Ok(None);
    };

    let history = store
        .upsert_history(HistoryUpsert {
            user_id,
            source: derive_source(&url),
            url,
            job_title: non_blank(meta.job_title),
            company_name: non_blank(meta.company_name),
            location: non_blank(meta.location),
            tone: tone.to_string(),
        })
        .await?;

    let letter = store
        .append_cover_letter(NewCoverLetter {
            history_id: history.id,
            user_id,
            markdown: markdown.to_string(),
            tone: tone.to_string(),
            user_prompt: user_prompt.to_string(),
        })
        .await?;

    info!(
        "Recorded cover letter v{} for history entry {} (user {})",
        letter.version, history.id, user_id
    );

    Ok(Some(RecordedGeneration { history, letter }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::history::ApplicationStatus;
    use crate::store::memory::MemoryStore;
    use crate::store::HistoryStore;

    fn meta(url: &str) -> JobMeta {
        JobMeta {
            url: Some(url.to_string()),
            job_title: Some("Backend Engineer".to_string()),
            company_name: Some("Acme".to_string()),
            location: None,
        }
    }

    #[test]
    fn test_derive_source_drops_www() {
        assert_eq!(
            derive_source("https://www.linkedin.com/jobs/view/123").as_deref(),
            Some("linkedin.com")
        );
        assert_eq!(
            derive_source("https://jobs.lever.co/acme/1").as_deref(),
            Some("jobs.lever.co")
        );
        assert_eq!(derive_source("not a url"), None);
    }

    #[tokio::test]
    async fn test_same_url_twice_yields_one_entry_and_two_versions() {
        let store = MemoryStore::default();
        let user_id = Uuid::new_v4();
        let url = "https://www.linkedin.com/jobs/view/1";

        let first = record_generation(&store, user_id, meta(url), "professional", "", "v1")
            .await
            .unwrap()
            .unwrap();
        let second = record_generation(&store, user_id, meta(url), "formal", "shorter", "v2")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.history.id, second.history.id);
        assert_eq!(first.letter.version, 1);
        assert_eq!(second.letter.version, 2);
        assert_eq!(second.history.tone, "formal");
        assert_eq!(second.history.source.as_deref(), Some("linkedin.com"));

        let history = store.list_history(user_id).await.unwrap();
        assert_eq!(history.len(), 1);
        let letters = store.list_cover_letters(user_id, first.history.id).await.unwrap();
        assert_eq!(
            letters.iter().map(|l| l.version).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[tokio::test]
    async fn test_regeneration_preserves_status() {
        let store = MemoryStore::default();
        let user_id = Uuid::new_v4();
        let url = "https://example.com/job";

        let first = record_generation(&store, user_id, meta(url), "casual", "", "v1")
            .await
            .unwrap()
            .unwrap();
        store
            .update_history_status(user_id, first.history.id, ApplicationStatus::Applied)
            .await
            .unwrap();
        let url_only = JobMeta {
            url: Some(url.to_string()),
            ..Default::default()
        };
        let second = record_generation(&store, user_id, url_only, "casual", "", "v2")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(second.history.status, "Applied");
        assert_eq!(second.history.job_title.as_deref(), Some("Backend Engineer"));
    }

    #[tokio::test]
    async fn test_missing_url_is_not_recorded() {
        let store = MemoryStore::default();
        let user_id = Uuid::new_v4();
        let recorded = record_generation(
            &store,
            user_id,
            JobMeta {
                url: Some("   ".to_string()),
                ..Default::default()
            },
            "professional",
            "",
            "body",
        )
        .await
        .unwrap();

        assert!(recorded.is_none());
        assert!(store.list_history(user_id).await.unwrap().is_empty());
    }
}
