//! User profile: editable fields, the current resume and the derived
//! `attention_needed` flag.

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeSummary;
use crate::models::user::{ProfileUpdate, User};
use crate::profile::attention::refresh_attention;
use crate::resume::storage::current_resume;
use crate::store::Store;

pub mod attention;
pub mod handlers;

/// A user together with a summary of their current resume.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub resume: Option<ResumeSummary>,
}

pub async fn load_profile(store: &dyn Store, user_id: Uuid) -> Result<UserProfile, AppError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let resume = current_resume(store, &user).await?;

    Ok(UserProfile {
        resume: resume.as_ref().map(ResumeSummary::from),
        user,
    })
}

/// Applies the editable fields and recomputes `attention_needed`.
pub async fn update_profile(
    store: &dyn Store,
    user_id: Uuid,
    update: ProfileUpdate,
) -> Result<UserProfile, AppError> {
    if update.is_empty() {
        return Err(AppError::Validation("No valid fields to update".to_string()));
    }

    let mut user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    update.apply(&mut user);
    refresh_attention(&mut user);
    store.update_user(&user).await?;

    load_profile(store, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::UserStore;

    #[tokio::test]
    async fn test_update_requires_a_known_field() {
        let user = User::fixture();
        let store = MemoryStore::with_user(user.clone());
        let err = update_profile(&store, user.id, ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "No valid fields to update"));
    }

    #[tokio::test]
    async fn test_update_persists_fields_and_recomputes_attention() {
        let user = User {
            latest_resume_id: None,
            ..User::fixture()
        };
        let store = MemoryStore::with_user(user.clone());

        let profile = update_profile(
            &store,
            user.id,
            ProfileUpdate {
                city: Some(Some("Toronto".to_string())),
                country: Some(Some("Canada".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(profile.user.city.as_deref(), Some("Toronto"));
        // Still no resume on file.
        assert!(profile.user.attention_needed);
        assert!(profile.resume.is_none());
    }

    #[tokio::test]
    async fn test_clearing_city_raises_attention_again() {
        let user = User {
            city: Some("Toronto".to_string()),
            country: Some("Canada".to_string()),
            latest_resume_id: Some(Uuid::new_v4()),
            attention_needed: false,
            ..User::fixture()
        };
        let store = MemoryStore::with_user(user.clone());
        let update: ProfileUpdate = serde_json::from_str(r#"{"city": null}"#).unwrap();

        update_profile(&store, user.id, update).await.unwrap();

        let stored = store.find_user(user.id).await.unwrap().unwrap();
        assert!(stored.city.is_none());
        assert_eq!(stored.country.as_deref(), Some("Canada"));
        assert!(stored.attention_needed);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = MemoryStore::default();
        let err = load_profile(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_profile_serializes_user_fields_at_top_level() {
        let profile = UserProfile {
            user: User::fixture(),
            resume: None,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["email"], "jane@example.com");
        assert!(json["resume"].is_null());
    }
}
