use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::models::user::User;

pub const TOKEN_TTL_DAYS: i64 = 7;

/// Wire format of the signed claim set.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    iat: i64,
    exp: i64,
}

/// Validated claims of a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaims {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Signs an HS256 session token for `user`, valid for seven days from `now`.
pub fn issue_token(user: &User, secret: &str, now: DateTime<Utc>) -> Result<String> {
    let id = user.id.to_string();
    let claims = TokenClaims {
        id: Some(id.clone()),
        sub: id,
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign session token")
}

/// Verifies signature and expiry, and requires a UUID `id` claim.
pub fn validate_token(token: &str, secret: &str) -> Result<AuthClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    })?;

    let claims = data.claims;
    let id = claims
        .id
        .filter(|id| !id.is_empty())
        .ok_or(AuthError::MissingIdClaim)?;
    let user_id = Uuid::parse_str(&id).map_err(|_| AuthError::TokenInvalid)?;

    Ok(AuthClaims {
        user_id,
        email: claims.email,
        name: claims.name,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn user() -> User {
        User::fixture()
    }

    #[test]
    fn test_issued_token_validates_with_claims() {
        let u = user();
        let now = Utc::now();
        let token = issue_token(&u, SECRET, now).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, u.id);
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.name, "Jane Doe");
        assert_eq!(claims.expires_at - claims.issued_at, 7 * 24 * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected_as_expired() {
        let token = issue_token(&user(), SECRET, Utc::now() - Duration::days(8)).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_token(&user(), SECRET, Utc::now()).unwrap();
        assert_eq!(
            validate_token(&token, "another-secret"),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(
            validate_token("not.a.token", SECRET),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn test_payload_without_id_is_rejected() {
        let claims = serde_json::json!({
            "sub": "someone",
            "email": "a@b.c",
            "exp": (Utc::now() + Duration::days(1)).timestamp(),
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            validate_token(&token, SECRET),
            Err(AuthError::MissingIdClaim)
        );
    }
}
