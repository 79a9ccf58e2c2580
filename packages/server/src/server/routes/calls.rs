use axum::{extract::Extension, Json};

use super::ApiError;
use crate::domains::conversations::actions::start_call;
use crate::kernel::{CallInitiation, CallRequest};
use crate::server::app::AppState;

/// Prepare a support call and return its greeting.
pub async fn initiate_call_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CallRequest>,
) -> Result<Json<CallInitiation>, ApiError> {
    let initiation = start_call(&state.graph, &state.conversations, request).await?;
    Ok(Json(initiation))
}
