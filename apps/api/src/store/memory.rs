//! In-memory `Store` and `BlobStore` doubles for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::blob::{Blob, BlobError, BlobStore};
use crate::models::history::{ApplicationStatus, CoverLetterRow, JobHistoryRow};
use crate::models::resume::ResumeRow;
use crate::models::user::User;
use crate::store::{
    HistoryStore, HistoryUpsert, NewCoverLetter, ResumeStore, Store, UserStore,
};

#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<User>>,
    pub resumes: Mutex<Vec<ResumeRow>>,
    pub history: Mutex<Vec<JobHistoryRow>>,
    pub letters: Mutex<Vec<CoverLetterRow>>,
}

impl MemoryStore {
    pub fn with_user(user: User) -> Self {
        let store = Self::default();
        store.users.lock().unwrap().push(user);
        store
    }

    pub fn resumes_for(&self, user_id: Uuid) -> Vec<ResumeRow> {
        self.resumes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.google_id == google_id)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(self.resumes.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_resume_for_user(&self, user_id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(self
            .resumes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn insert_resume(&self, resume: &ResumeRow) -> Result<()> {
        self.resumes.lock().unwrap().push(resume.clone());
        Ok(())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<()> {
        self.resumes.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn upsert_history(&self, entry: HistoryUpsert) -> Result<JobHistoryRow> {
        let mut history = self.history.lock().unwrap();
        if let Some(existing) = history
            .iter_mut()
            .find(|h| h.user_id == entry.user_id && h.url == entry.url)
        {
            existing.job_title = entry.job_title.or(existing.job_title.take());
            existing.company_name = entry.company_name.or(existing.company_name.take());
            existing.location = entry.location.or(existing.location.take());
            existing.source = entry.source.or(existing.source.take());
            existing.tone = entry.tone;
            return Ok(existing.clone());
        }

        // Strictly increasing timestamps keep newest-first ordering deterministic.
        let created_at = Utc::now() + Duration::milliseconds(history.len() as i64);
        let row = JobHistoryRow {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            job_title: entry.job_title,
            company_name: entry.company_name,
            location: entry.location,
            url: entry.url,
            source: entry.source,
            status: ApplicationStatus::NotApplied.as_str().to_string(),
            tone: entry.tone,
            created_at,
        };
        history.push(row.clone());
        Ok(row)
    }

    async fn list_history(&self, user_id: Uuid) -> Result<Vec<JobHistoryRow>> {
        let mut rows: Vec<_> = self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_history_status(
        &self,
        user_id: Uuid,
        history_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool> {
        let mut history = self.history.lock().unwrap();
        match history
            .iter_mut()
            .find(|h| h.id == history_id && h.user_id == user_id)
        {
            Some(entry) => {
                entry.status = status.as_str().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn append_cover_letter(&self, letter: NewCoverLetter) -> Result<CoverLetterRow> {
        let mut letters = self.letters.lock().unwrap();
        let version = letters
            .iter()
            .filter(|l| l.history_id == letter.history_id)
            .map(|l| l.version)
            .max()
            .unwrap_or(0)
            + 1;
        let row = CoverLetterRow {
            id: Uuid::new_v4(),
            history_id: letter.history_id,
            user_id: letter.user_id,
            markdown: letter.markdown,
            tone: letter.tone,
            user_prompt: letter.user_prompt,
            version,
            created_at: Utc::now(),
        };
        letters.push(row.clone());
        Ok(row)
    }

    async fn list_cover_letters(
        &self,
        user_id: Uuid,
        history_id: Uuid,
    ) -> Result<Vec<CoverLetterRow>> {
        let mut rows: Vec<_> = self
            .letters
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.history_id == history_id && l.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|l| l.version);
        Ok(rows)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }

    async fn close(&self) {}
}

#[derive(Default)]
pub struct MemoryBlobStore {
    pub blobs: Mutex<HashMap<String, Blob>>,
    /// When set, `put` fails with this message.
    pub fail_puts: Mutex<Option<BlobError>>,
}

impl MemoryBlobStore {
    pub fn keys(&self) -> Vec<String> {
        self.blobs.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), BlobError> {
        if let Some(err) = self.fail_puts.lock().unwrap().clone() {
            return Err(err);
        }
        self.blobs.lock().unwrap().insert(
            key.to_string(),
            Blob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Blob, BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.blobs
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }
}
