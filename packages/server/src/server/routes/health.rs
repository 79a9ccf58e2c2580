use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    memory: bool,
    rag: bool,
}

/// Service index
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": "Voice Support Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "users_needing_support": "/api/users/needing-support",
            "initiate_call": "/api/calls/initiate",
            "conversation": "/api/conversations/{user_id}",
            "websocket": "/ws/conversation/{conversation_id}",
        }
    }))
}

/// Health check endpoint
///
/// Reports readiness of the memory store and the context retriever.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            memory: state.deps.memory.is_ready(),
            rag: state.deps.retriever.is_ready(),
        }),
    )
}
