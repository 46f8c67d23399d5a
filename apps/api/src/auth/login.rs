use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::google::{GoogleError, GoogleIdentity, IdentityProvider};
use crate::auth::AuthError;
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::Store;

/// Verifies a Google access token. When verification fails and fallback is
/// enabled, a client-supplied profile is accepted instead.
pub async fn verify_identity(
    provider: &dyn IdentityProvider,
    access_token: &str,
    fallback_profile: Option<GoogleIdentity>,
    allow_fallback: bool,
) -> Result<GoogleIdentity, AppError> {
    let identity = match provider.userinfo(access_token).await {
        Ok(identity) => identity,
        Err(e) => match fallback_profile.filter(|_| allow_fallback) {
            Some(profile) => {
                warn!("Google verification failed ({e}); using client-supplied profile");
                profile
            }
            None => {
                return Err(match e {
                    GoogleError::Rejected(status) => AuthError::IdentityUnverified(format!(
                        "Google userinfo responded with status {status}"
                    ))
                    .into(),
                    GoogleError::Http(err) if err.is_timeout() => {
                        AppError::retryable("identity provider", err.to_string())
                    }
                    GoogleError::Http(err) => AppError::upstream(
                        "identity provider",
                        format!("Error authenticating with Google: {err}"),
                    ),
                });
            }
        },
    };

    if !identity.is_complete() {
        return Err(AuthError::IncompleteProfile.into());
    }
    Ok(identity)
}

/// Returns the local user for a Google identity, creating it on first sight.
/// Lookup is by Google id, never by email.
pub async fn find_or_create_user(
    store: &dyn Store,
    identity: &GoogleIdentity,
) -> Result<User, AppError> {
    if let Some(user) = store.find_user_by_google_id(&identity.id).await? {
        return Ok(user);
    }

    let user = User {
        id: Uuid::new_v4(),
        google_id: identity.id.clone(),
        email: identity.email.clone(),
        name: identity.name.clone(),
        picture: identity.picture.clone(),
        city: None,
        country: None,
        postal_code: None,
        personal_prompt: None,
        attention_needed: true,
        latest_resume_id: None,
        created_at: Utc::now(),
    };
    store.insert_user(&user).await?;

    info!("Created user {} for Google account {}", user.id, identity.id);
    Ok(user)
}
