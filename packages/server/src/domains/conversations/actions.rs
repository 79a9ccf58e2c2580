//! Conversation actions - entry points used by the HTTP and WebSocket routes.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use super::active::ActiveConversations;
use super::graph::ConversationGraph;
use super::models::{Conversation, GeneratedReply, IncomingMessage};
use crate::common::{ChatTurn, ConversationRecord, UserMemory};
use crate::kernel::{CallInitiation, CallRequest};

const RAG_CONTEXT_LIMIT: usize = 3;
const HISTORY_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("Conversation not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Prepare a call: load what we know about the user, register the
/// conversation and generate the greeting.
pub async fn start_call(
    graph: &ConversationGraph,
    active: &ActiveConversations,
    request: CallRequest,
) -> Result<CallInitiation, ConversationError> {
    let deps = graph.deps();
    let context = request
        .context
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));

    let memory = deps.memory.get_user_memory(&request.user_id).await?;
    let query = context
        .get("original_post")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let rag_context = deps
        .retriever
        .get_relevant_context(&request.user_id, query, RAG_CONTEXT_LIMIT)
        .await?;

    let conversation_id = ActiveConversations::new_id(&request.user_id);
    active
        .insert(Conversation {
            conversation_id: conversation_id.clone(),
            user_id: request.user_id.clone(),
            username: request.username.clone(),
            phone_number: request.phone_number.clone(),
            context: context.clone(),
            memory,
            rag_context,
            started_at: Utc::now(),
            messages: Vec::new(),
        })
        .await;

    let initial_message = graph
        .generate_initial_greeting(&request.username, &context)
        .await;

    tracing::info!(
        conversation_id = %conversation_id,
        username = %request.username,
        "Conversation ready"
    );

    Ok(CallInitiation {
        conversation_id,
        initial_message,
        phone_number: request.phone_number,
        status: "ready".to_string(),
    })
}

/// Append a turn to a live conversation and the user's stored history.
pub async fn add_message(
    graph: &ConversationGraph,
    active: &ActiveConversations,
    conversation_id: &str,
    message: IncomingMessage,
) -> Result<(), ConversationError> {
    let user_id = active
        .get(conversation_id)
        .await
        .map(|c| c.user_id)
        .ok_or(ConversationError::NotFound)?;

    active
        .append_turn(
            conversation_id,
            ChatTurn {
                role: message.role.clone(),
                content: message.content.clone(),
                timestamp: message.timestamp,
            },
        )
        .await;

    graph
        .deps()
        .memory
        .add_message(&user_id, &message.role, &message.content)
        .await?;
    Ok(())
}

/// Generate a reply for a live conversation without recording any turns.
pub async fn generate_reply(
    graph: &ConversationGraph,
    active: &ActiveConversations,
    conversation_id: &str,
    user_message: &str,
) -> Result<GeneratedReply, ConversationError> {
    let conversation = active
        .get(conversation_id)
        .await
        .ok_or(ConversationError::NotFound)?;

    Ok(graph.generate_response(&conversation, user_message).await)
}

/// One exchange on the live channel: both turns are appended to the
/// conversation and the assistant turn is returned.
pub async fn exchange(
    graph: &ConversationGraph,
    active: &ActiveConversations,
    conversation_id: &str,
    user_message: &str,
) -> Result<ChatTurn, ConversationError> {
    let reply = generate_reply(graph, active, conversation_id, user_message).await?;
    let now = Utc::now().to_rfc3339();

    active
        .append_turn(
            conversation_id,
            ChatTurn {
                role: "user".to_string(),
                content: user_message.to_string(),
                timestamp: now.clone(),
            },
        )
        .await;

    let assistant = ChatTurn {
        role: "assistant".to_string(),
        content: reply.response,
        timestamp: now,
    };
    active.append_turn(conversation_id, assistant.clone()).await;

    Ok(assistant)
}

#[derive(Debug, Clone, Serialize)]
pub struct UserConversations {
    pub user_id: String,
    pub memory: UserMemory,
    pub conversations: Vec<ConversationRecord>,
    pub total_messages: usize,
}

pub async fn user_conversations(
    graph: &ConversationGraph,
    user_id: &str,
) -> Result<UserConversations, ConversationError> {
    let deps = graph.deps();
    let memory = deps.memory.get_user_memory(user_id).await?;
    let conversations = deps
        .memory
        .get_conversation_history(user_id, HISTORY_LIMIT)
        .await?;
    let total_messages = conversations.iter().map(|c| c.messages.len()).sum();

    Ok(UserConversations {
        user_id: user_id.to_string(),
        memory,
        conversations,
        total_messages,
    })
}
