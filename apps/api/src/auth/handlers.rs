//! Axum route handlers for the Auth API.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::extractor::{authenticate, bearer_token};
use crate::auth::google::GoogleIdentity;
use crate::auth::login::{find_or_create_user, verify_identity};
use crate::auth::tokens::issue_token;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    pub token: Option<String>,
    /// Client-side profile, honoured only when profile fallback is enabled.
    pub profile: Option<GoogleIdentity>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/google
///
/// Exchanges a Google access token for a JobMate session token, creating the
/// user on first sign-in.
pub async fn handle_google_login(
    State(state): State<AppState>,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let google_token = request
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No token provided".to_string()))?;

    let identity = verify_identity(
        state.identity.as_ref(),
        &google_token,
        request.profile,
        state.config.allow_profile_fallback,
    )
    .await?;

    let user = find_or_create_user(state.store.as_ref(), &identity).await?;
    let token = issue_token(&user, &state.config.jwt_secret, Utc::now())?;

    Ok(Json(LoginResponse { user, token }))
}

/// GET /api/auth/is-valid-token
///
/// `{"valid": true}` for a live session token. A missing token is a 400,
/// a bad one a 401; both carry the reason.
pub async fn handle_is_valid_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if bearer_token(&headers).is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "valid": false, "error": "Token cannot be empty" })),
        )
            .into_response();
    }

    match authenticate(&headers, &state.config.jwt_secret) {
        Ok(_) => Json(json!({ "valid": true })).into_response(),
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "valid": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}
