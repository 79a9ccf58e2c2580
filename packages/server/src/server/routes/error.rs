use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::conversations::ConversationError;

/// Error body `{"detail": ...}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ConversationError> for ApiError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::NotFound => Self {
                status: StatusCode::NOT_FOUND,
                detail: "Conversation not found".to_string(),
            },
            ConversationError::Internal(e) => {
                tracing::error!(error = %e, "Request failed");
                Self::internal(e)
            }
        }
    }
}
