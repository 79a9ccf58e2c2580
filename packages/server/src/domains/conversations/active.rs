//! In-process registry of live conversations.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::Conversation;
use crate::common::ChatTurn;

/// Concurrent writers to one conversation are not coordinated beyond the
/// lock; the last write wins.
#[derive(Default)]
pub struct ActiveConversations {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl ActiveConversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_id(user_id: &str) -> String {
        format!("conv_{}_{}", user_id, Uuid::new_v4().simple())
    }

    pub async fn insert(&self, conversation: Conversation) {
        self.conversations
            .write()
            .await
            .insert(conversation.conversation_id.clone(), conversation);
    }

    pub async fn get(&self, conversation_id: &str) -> Option<Conversation> {
        self.conversations
            .read()
            .await
            .get(conversation_id)
            .cloned()
    }

    pub async fn contains(&self, conversation_id: &str) -> bool {
        self.conversations
            .read()
            .await
            .contains_key(conversation_id)
    }

    /// Append a turn. Returns false if the conversation is unknown.
    pub async fn append_turn(&self, conversation_id: &str, turn: ChatTurn) -> bool {
        match self.conversations.write().await.get_mut(conversation_id) {
            Some(conversation) => {
                conversation.messages.push(turn);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}
