use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiError;
use crate::domains::conversations::actions::{
    add_message, generate_reply, user_conversations, UserConversations,
};
use crate::domains::conversations::{GeneratedReply, IncomingMessage};
use crate::server::app::AppState;

pub async fn user_conversations_handler(
    Extension(state): Extension<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserConversations>, ApiError> {
    Ok(Json(user_conversations(&state.graph, &user_id).await?))
}

pub async fn add_message_handler(
    Extension(state): Extension<AppState>,
    Path(conversation_id): Path<String>,
    Json(message): Json<IncomingMessage>,
) -> Result<Json<Value>, ApiError> {
    add_message(&state.graph, &state.conversations, &conversation_id, message).await?;
    Ok(Json(json!({ "status": "added" })))
}

#[derive(Deserialize)]
pub struct GenerateQuery {
    user_message: String,
}

pub async fn generate_response_handler(
    Extension(state): Extension<AppState>,
    Path(conversation_id): Path<String>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<GeneratedReply>, ApiError> {
    let reply = generate_reply(
        &state.graph,
        &state.conversations,
        &conversation_id,
        &query.user_message,
    )
    .await?;
    Ok(Json(reply))
}
