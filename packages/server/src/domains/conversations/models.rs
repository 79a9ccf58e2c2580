use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ChatTurn, SupportResource, UserMemory};

/// A live support call, held in memory for its duration.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub conversation_id: String,
    pub user_id: String,
    pub username: String,
    pub phone_number: String,
    pub context: serde_json::Value,
    pub memory: UserMemory,
    pub rag_context: Vec<SupportResource>,
    pub started_at: DateTime<Utc>,
    pub messages: Vec<ChatTurn>,
}

/// Body of `POST /api/conversations/:id/message`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

/// Result of one pass through the conversation graph.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReply {
    pub response: String,
    pub reasoning: String,
    pub updated_memory: UserMemory,
}
