use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Liveness plus a database round trip.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database_connected = state.store.ping().await;
    Json(json!({
        "status": "healthy",
        "message": "Server is running",
        "database_connected": database_connected
    }))
}
