use crate::models::user::User;

/// A profile needs attention while any field the cover letter header depends
/// on is missing or blank, or no resume is on file.
pub fn attention_needed(user: &User) -> bool {
    let blank = |v: Option<&str>| v.map_or(true, |s| s.trim().is_empty());

    blank(user.city.as_deref())
        || blank(user.country.as_deref())
        || blank(Some(user.name.as_str()))
        || blank(Some(user.email.as_str()))
        || user.latest_resume_id.is_none()
}

/// Recomputes the derived flag in place. Call after every profile or resume mutation.
pub fn refresh_attention(user: &mut User) {
    user.attention_needed = attention_needed(user);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn complete_user() -> User {
        User {
            city: Some("Toronto".to_string()),
            country: Some("Canada".to_string()),
            latest_resume_id: Some(Uuid::new_v4()),
            ..User::fixture()
        }
    }

    #[test]
    fn test_fresh_sign_in_needs_attention() {
        assert!(attention_needed(&User::fixture()));
    }

    #[test]
    fn test_complete_profile_needs_no_attention() {
        assert!(!attention_needed(&complete_user()));
    }

    #[test]
    fn test_missing_city_needs_attention() {
        let mut u = complete_user();
        u.city = None;
        assert!(attention_needed(&u));
    }

    #[test]
    fn test_blank_country_needs_attention() {
        let mut u = complete_user();
        u.country = Some("   ".to_string());
        assert!(attention_needed(&u));
    }

    #[test]
    fn test_empty_name_needs_attention() {
        let mut u = complete_user();
        u.name = String::new();
        assert!(attention_needed(&u));
    }

    #[test]
    fn test_missing_resume_needs_attention() {
        let mut u = complete_user();
        u.latest_resume_id = None;
        assert!(attention_needed(&u));
    }

    #[test]
    fn test_postal_code_is_not_required() {
        let mut u = complete_user();
        u.postal_code = None;
        assert!(!attention_needed(&u));
    }

    #[test]
    fn test_refresh_updates_flag() {
        let mut u = complete_user();
        refresh_attention(&mut u);
        assert!(!u.attention_needed);
        u.latest_resume_id = None;
        refresh_attention(&mut u);
        assert!(u.attention_needed);
    }
}
