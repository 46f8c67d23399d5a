use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub personal_prompt: Option<String>,
    pub attention_needed: bool,
    pub latest_resume_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Editable profile fields. Anything else in the request body is ignored.
///
/// The optional fields distinguish a missing key (`None`, left alone) from an
/// explicit `null` (`Some(None)`, cleared). `name` is required on the user, so
/// a `null` name counts as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub personal_prompt: Option<Option<String>>,
}

/// Only runs for keys that are in the body, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.postal_code.is_none()
            && self.personal_prompt.is_none()
    }

    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(city) = self.city {
            user.city = city;
        }
        if let Some(country) = self.country {
            user.country = country;
        }
        if let Some(postal_code) = self.postal_code {
            user.postal_code = postal_code;
        }
        if let Some(personal_prompt) = self.personal_prompt {
            user.personal_prompt = personal_prompt;
        }
    }
}

#[cfg(test)]
impl User {
    /// A freshly signed-in user: identity fields set, location and resume missing.
    pub fn fixture() -> Self {
        User {
            id: Uuid::new_v4(),
            google_id: format!("g-{}", Uuid::new_v4().simple()),
            email: "jane@example.com".to_string(),
            name: "Jane Doe".to_string(),
            picture: None,
            city: None,
            country: None,
            postal_code: None,
            personal_prompt: None,
            attention_needed: true,
            latest_resume_id: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_detected() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            city: Some(Some("Lyon".to_string())),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_apply_only_touches_provided_fields() {
        let mut user = User::fixture();
        user.country = Some("France".to_string());
        ProfileUpdate {
            city: Some(Some("Lyon".to_string())),
            ..Default::default()
        }
        .apply(&mut user);
        assert_eq!(user.city.as_deref(), Some("Lyon"));
        assert_eq!(user.country.as_deref(), Some("France"));
        assert_eq!(user.name, "Jane Doe");
    }

    #[test]
    fn test_null_clears_a_field_but_missing_keys_are_kept() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"city": null, "personal_prompt": "Be brief."}"#).unwrap();
        assert_eq!(update.city, Some(None));
        assert_eq!(update.country, None);
        assert!(!update.is_empty());

        let mut user = User::fixture();
        user.city = Some("Lyon".to_string());
        user.country = Some("France".to_string());
        update.apply(&mut user);

        assert!(user.city.is_none());
        assert_eq!(user.country.as_deref(), Some("France"));
        assert_eq!(user.personal_prompt.as_deref(), Some("Be brief."));
    }

    #[test]
    fn test_null_name_counts_as_missing() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert!(update.is_empty());
    }
}
