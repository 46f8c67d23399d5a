use anyhow::{Context, Result};

use crate::resume::mime::MimeDetection;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub jwt_secret: String,
    /// Missing key is tolerated at startup; generation then fails per request.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub ai_timeout_secs: u64,
    pub blob_timeout_secs: u64,
    /// Accept a client-supplied Google profile when token verification fails.
    pub allow_profile_fallback: bool,
    pub mime_detection: MimeDetection,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            ai_timeout_secs: std::env::var("AI_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<u64>()
                .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
            blob_timeout_secs: std::env::var("BLOB_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("BLOB_TIMEOUT_SECS must be a whole number of seconds")?,
            allow_profile_fallback: parse_flag(
                std::env::var("ALLOW_PROFILE_FALLBACK").ok().as_deref(),
            ),
            mime_detection: std::env::var("MIME_DETECTION")
                .unwrap_or_else(|_| "sniff".to_string())
                .parse::<MimeDetection>()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Local defaults for router tests; nothing here is contacted.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/jobmate_test".to_string(),
            s3_bucket: "jobmate-test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            jwt_secret: "router-test-secret".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            ai_timeout_secs: 60,
            blob_timeout_secs: 30,
            allow_profile_fallback: false,
            mime_detection: MimeDetection::Sniff,
            port: 8080,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}
