//! Authentication: Google identity resolution, JWT issuance and the
//! `AuthUser` extractor that guards every user-scoped route.

use thiserror::Error;

pub mod extractor;
pub mod google;
pub mod handlers;
pub mod login;
pub mod tokens;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization token is missing")]
    TokenMissing,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Invalid token payload")]
    MissingIdClaim,

    #[error("Unable to verify Google token: {0}")]
    IdentityUnverified(String),

    #[error("Google profile information incomplete")]
    IncompleteProfile,

    #[error("Missing X-Google-Token header")]
    GoogleTokenMissing,
}
