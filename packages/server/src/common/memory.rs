use serde::{Deserialize, Serialize};

/// One remembered fact about a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub text: String,
    pub timestamp: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Everything remembered about a user (`{user}_memory.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMemory {
    #[serde(default)]
    pub memories: Vec<MemoryEntry>,
    #[serde(default)]
    pub count: usize,
}

/// A single spoken or typed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

/// One call's worth of turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub started_at: String,
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default)]
    pub ended: bool,
}

/// All calls with a user (`{user}_history.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    #[serde(default)]
    pub conversations: Vec<ConversationRecord>,
}

/// Support snippet handed to the model as retrieved context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub score: f32,
}
