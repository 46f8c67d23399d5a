use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::history::{ApplicationStatus, CoverLetterRow, JobHistoryRow};
use crate::models::resume::ResumeRow;
use crate::models::user::User;
use crate::store::{
    HistoryStore, HistoryUpsert, NewCoverLetter, ResumeStore, Store, UserStore,
};

/// PostgreSQL-backed store. Constructed once in `main` and closed on shutdown.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens the connection pool and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = $1")
                .bind(google_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, google_id, email, name, picture, city, country, postal_code,
                 personal_prompt, attention_needed, latest_resume_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id)
        .bind(&user.google_id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.picture)
        .bind(&user.city)
        .bind(&user.country)
        .bind(&user.postal_code)
        .bind(&user.personal_prompt)
        .bind(user.attention_needed)
        .bind(user.latest_resume_id)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, picture = $3, city = $4, country = $5, postal_code = $6,
                personal_prompt = $7, attention_needed = $8, latest_resume_id = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.picture)
        .bind(&user.city)
        .bind(&user.country)
        .bind(&user.postal_code)
        .bind(&user.personal_prompt)
        .bind(user.attention_needed)
        .bind(user.latest_resume_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_resume_for_user(&self, user_id: Uuid) -> Result<Option<ResumeRow>> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_resume(&self, resume: &ResumeRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, file_name, resume_text, blob_key, content_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.file_name)
        .bind(&resume.resume_text)
        .bind(&resume.blob_key)
        .bind(&resume.content_type)
        .bind(resume.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for PgStore {
    async fn upsert_history(&self, entry: HistoryUpsert) -> Result<JobHistoryRow> {
        Ok(sqlx::query_as::<_, JobHistoryRow>(
            r#"
            INSERT INTO job_history
                (id, user_id, job_title, company_name, location, url, source, status, tone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id, url) DO UPDATE SET
                job_title = COALESCE(EXCLUDED.job_title, job_history.job_title),
                company_name = COALESCE(EXCLUDED.company_name, job_history.company_name),
                location = COALESCE(EXCLUDED.location, job_history.location),
                source = COALESCE(EXCLUDED.source, job_history.source),
                tone = EXCLUDED.tone
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(&entry.job_title)
        .bind(&entry.company_name)
        .bind(&entry.location)
        .bind(&entry.url)
        .bind(&entry.source)
        .bind(ApplicationStatus::NotApplied.as_str())
        .bind(&entry.tone)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_history(&self, user_id: Uuid) -> Result<Vec<JobHistoryRow>> {
        Ok(sqlx::query_as::<_, JobHistoryRow>(
            "SELECT * FROM job_history WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_history_status(
        &self,
        user_id: Uuid,
        history_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<bool> {
        let result =
            sqlx::query("UPDATE job_history SET status = $1 WHERE id = $2 AND user_id = $3")
                .bind(status.as_str())
                .bind(history_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_cover_letter(&self, letter: NewCoverLetter) -> Result<CoverLetterRow> {
        let mut tx = self.pool.begin().await?;

        // Serialize concurrent appends for the same entry on the parent row.
        sqlx::query("SELECT id FROM job_history WHERE id = $1 FOR UPDATE")
            .bind(letter.history_id)
            .execute(&mut *tx)
            .await?;

        let current_max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(version) FROM cover_letters WHERE history_id = $1")
                .bind(letter.history_id)
                .fetch_one(&mut *tx)
                .await?;
        let new_version = current_max.unwrap_or(0) + 1;

        let row = sqlx::query_as::<_, CoverLetterRow>(
            r#"
            INSERT INTO cover_letters
                (id, history_id, user_id, markdown, tone, user_prompt, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(letter.history_id)
        .bind(letter.user_id)
        .bind(&letter.markdown)
        .bind(&letter.tone)
        .bind(&letter.user_prompt)
        .bind(new_version)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn list_cover_letters(
        &self,
        user_id: Uuid,
        history_id: Uuid,
    ) -> Result<Vec<CoverLetterRow>> {
        Ok(sqlx::query_as::<_, CoverLetterRow>(
            r#"
            SELECT * FROM cover_letters
            WHERE history_id = $1 AND user_id = $2
            ORDER BY version ASC
            "#,
        )
        .bind(history_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}
