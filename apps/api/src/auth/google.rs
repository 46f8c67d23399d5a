//! Google identity lookup via the OAuth2 userinfo endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const USERINFO_TIMEOUT: Duration = Duration::from_secs(10);

/// The subset of the Google profile we keep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleIdentity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleIdentity {
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty() && !self.email.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum GoogleError {
    /// Google answered but refused the token.
    #[error("Google userinfo responded with status {0}")]
    Rejected(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn userinfo(&self, access_token: &str) -> Result<GoogleIdentity, GoogleError>;
}

#[derive(Clone)]
pub struct GoogleClient {
    client: Client,
}

impl GoogleClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(USERINFO_TIMEOUT)
                .build()
                .context("Failed to build Google HTTP client")?,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleClient {
    async fn userinfo(&self, access_token: &str) -> Result<GoogleIdentity, GoogleError> {
        let response = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GoogleError::Rejected(status.as_u16()));
        }

        Ok(response.json::<GoogleIdentity>().await?)
    }
}
