pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::cover_letter::handlers as cover_letter;
use crate::drive::handlers as drive;
use crate::history::handlers as history;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Auth
        .route("/api/auth/google", post(auth::handle_google_login))
        .route("/api/auth/is-valid-token", get(auth::handle_is_valid_token))
        // Profile and resume
        .route(
            "/api/profile",
            get(profile::handle_get_profile).post(profile::handle_update_profile),
        )
        .route(
            "/api/profile/resume",
            get(profile::handle_download_resume)
                .post(profile::handle_upload_resume)
                .delete(profile::handle_delete_resume),
        )
        // Cover letters
        .route(
            "/api/cover-letter",
            post(cover_letter::handle_generate_cover_letter),
        )
        .route("/api/cover-letter/tones", get(cover_letter::handle_list_tones))
        // History
        .route("/api/history", get(history::handle_list_history))
        .route("/api/history/export", get(history::handle_export_history))
        .route("/api/history/:id/letters", get(history::handle_list_letters))
        .route("/api/history/:id/status", patch(history::handle_update_status))
        // Drive
        .route("/api/drive/cover-letter", post(drive::handle_save_to_drive))
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES))
        .with_state(state)
}
