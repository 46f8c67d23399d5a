use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::tokens::{validate_token, AuthClaims};
use crate::auth::AuthError;
use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller of a user-scoped route.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub claims: AuthClaims,
}

/// Raw token from `Authorization`, with an optional `Bearer ` prefix removed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::TokenMissing)?;
    let claims = validate_token(token, secret)?;
    Ok(AuthUser {
        user_id: claims.user_id,
        claims,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(authenticate(&parts.headers, &state.config.jwt_secret)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tokens::issue_token;
    use crate::models::user::User;
    use axum::http::HeaderValue;
    use chrono::Utc;

    const SECRET: &str = "extractor-secret";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_prefix_is_optional() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearerabc")), Some("Bearerabc"));
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_missing_header_is_token_missing() {
        assert_eq!(
            authenticate(&HeaderMap::new(), SECRET).unwrap_err(),
            AuthError::TokenMissing
        );
    }

    #[test]
    fn test_valid_token_yields_user_id() {
        let user = User::fixture();
        let token = issue_token(&user, SECRET, Utc::now()).unwrap();
        let auth = authenticate(&headers(&format!("Bearer {token}")), SECRET).unwrap();
        assert_eq!(auth.user_id, user.id);
        assert_eq!(auth.claims.email, user.email);
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let token = issue_token(&User::fixture(), SECRET, Utc::now()).unwrap();
        assert_eq!(
            authenticate(&headers(&format!("Bearer {token}x")), SECRET).unwrap_err(),
            AuthError::TokenInvalid
        );
    }
}
