//! Live conversation channel.
//!
//! GET /ws/conversation/:id
//!
//! Each `{"type":"user_message","content":...}` text frame is answered with
//! `{"type":"assistant_message","content":...,"timestamp":...}`. Unknown
//! conversations are closed with 1008.

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Extension, Path,
    },
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use crate::domains::conversations::actions::exchange;
use crate::domains::conversations::ConversationError;
use crate::server::app::AppState;

#[derive(Deserialize)]
struct ClientFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: String,
}

pub async fn conversation_ws_handler(
    ws: WebSocketUpgrade,
    Extension(state): Extension<AppState>,
    Path(conversation_id): Path<String>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, conversation_id))
}

async fn close_not_found(mut socket: WebSocket) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code: close_code::POLICY,
            reason: "Conversation not found".into(),
        })))
        .await;
}

async fn handle_socket(mut socket: WebSocket, state: AppState, conversation_id: String) {
    if !state.conversations.contains(&conversation_id).await {
        close_not_found(socket).await;
        return;
    }

    while let Some(frame) = socket.recv().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(conversation_id = %conversation_id, error = %e, "WebSocket receive failed");
                break;
            }
        };

        let frame: ClientFrame = match serde_json::from_str(&text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(conversation_id = %conversation_id, error = %e, "Ignoring malformed frame");
                continue;
            }
        };
        if frame.kind != "user_message" {
            continue;
        }

        match exchange(&state.graph, &state.conversations, &conversation_id, &frame.content).await {
            Ok(turn) => {
                let payload = json!({
                    "type": "assistant_message",
                    "content": turn.content,
                    "timestamp": turn.timestamp,
                });
                if socket.send(Message::Text(payload.to_string())).await.is_err() {
                    break;
                }
            }
            Err(ConversationError::NotFound) => {
                close_not_found(socket).await;
                return;
            }
            Err(e) => {
                tracing::error!(conversation_id = %conversation_id, error = %e, "Reply generation failed");
            }
        }
    }

    tracing::info!(conversation_id = %conversation_id, "WebSocket disconnected");
}
