//! Conversation graph for support calls.
//!
//! A fixed four-step pipeline per user message:
//! analyze context -> retrieve memory -> generate response -> update memory.
//! There is no branching; every step degrades to a neutral value on failure.

use chrono::Utc;

use super::models::{Conversation, GeneratedReply};
use crate::common::{truncate_chars, ChatTurn, MemoryEntry, SupportResource, UserMemory};
use crate::kernel::memory::MIN_MEMORABLE_CHARS;
use crate::kernel::{CompletionRequest, ServerDeps};

pub const FALLBACK_RESPONSE: &str =
    "I'm here to listen and support you. How are you feeling right now?";

pub const REASONING: &str = "Generated response using context-aware language model";

const MEMORY_SEARCH_LIMIT: usize = 5;
const CONTEXT_MEMORIES: usize = 3;
const CONTEXT_TURNS: usize = 3;
const SNIPPET_CHARS: usize = 100;
const GREETING_POST_CHARS: usize = 200;

const RESPONSE_SYSTEM_PROMPT: &str = "You are an automated voice support assistant. You are not \
a therapist, counsellor or clinician and never claim to be one. You listen, validate feelings and \
suggest simple calming techniques. If the person mentions being in danger or thinking about \
harming themselves, gently urge them to contact local emergency services or a crisis line such \
as 988 in the US, and keep them talking until they agree to.";

const GREETING_SYSTEM_PROMPT: &str = "You are an automated voice support assistant placing a \
call the person agreed to. You are not a therapist and say so if asked.";

/// Working state threaded through the steps.
struct ConversationState<'a> {
    conversation: &'a Conversation,
    user_message: &'a str,
    relevant_memories: Vec<MemoryEntry>,
    response: String,
}

pub struct ConversationGraph {
    deps: ServerDeps,
}

impl ConversationGraph {
    pub fn new(deps: ServerDeps) -> Self {
        Self { deps }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    /// Run the four steps for one user message.
    pub async fn generate_response(
        &self,
        conversation: &Conversation,
        user_message: &str,
    ) -> GeneratedReply {
        let state = analyze_context(conversation, user_message);
        let state = self.retrieve_memory(state).await;
        let state = self.generate(state).await;
        let updated_memory = self.update_memory(&state).await;

        GeneratedReply {
            response: state.response,
            reasoning: REASONING.to_string(),
            updated_memory,
        }
    }

    async fn retrieve_memory<'a>(&self, mut state: ConversationState<'a>) -> ConversationState<'a> {
        if state.user_message.is_empty() {
            return state;
        }

        state.relevant_memories = self
            .deps
            .memory
            .search_memories(
                &state.conversation.user_id,
                state.user_message,
                MEMORY_SEARCH_LIMIT,
            )
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %state.conversation.user_id, error = %e, "Memory search failed");
                Vec::new()
            });
        state
    }

    async fn generate<'a>(&self, mut state: ConversationState<'a>) -> ConversationState<'a> {
        let context = build_context(
            &state.conversation.rag_context,
            &state.relevant_memories,
            &state.conversation.messages,
        );
        let prompt = format!(
            "Context for this call:\n{}\n\nThe person just said: {}\n\n\
Reply in two or three short spoken sentences. Acknowledge what they said, help them feel heard \
and calmer, and use the support resources above when they fit. Do not diagnose.",
            context, state.user_message
        );

        let request = CompletionRequest::new(RESPONSE_SYSTEM_PROMPT, prompt)
            .temperature(0.7)
            .max_tokens(300);

        state.response = match self.deps.ai.complete(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => FALLBACK_RESPONSE.to_string(),
            Err(e) => {
                tracing::error!(user_id = %state.conversation.user_id, error = %e, "Error generating response");
                FALLBACK_RESPONSE.to_string()
            }
        };
        state
    }

    async fn update_memory(&self, state: &ConversationState<'_>) -> UserMemory {
        let user_id = &state.conversation.user_id;

        if state.user_message.chars().count() > MIN_MEMORABLE_CHARS {
            let metadata = serde_json::json!({
                "timestamp": Utc::now().to_rfc3339(),
                "context": "voice_call",
            });
            if let Err(e) = self
                .deps
                .memory
                .add_memory(user_id, &format!("User said: {}", state.user_message), metadata)
                .await
            {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to store memory");
            }
        }

        self.deps
            .memory
            .get_user_memory(user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to load memory");
                UserMemory::default()
            })
    }

    /// Opening line for a call, built from the post that triggered outreach.
    pub async fn generate_initial_greeting(
        &self,
        username: &str,
        context: &serde_json::Value,
    ) -> String {
        let original_post = context
            .get("original_post")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        let concerns: Vec<&str> = context
            .pointer("/sentiment_analysis/concerns")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(|c| c.as_str()).collect())
            .unwrap_or_default();
        let concerns = if concerns.is_empty() {
            "general concerns".to_string()
        } else {
            concerns.join(", ")
        };

        let prompt = format!(
            "You are calling @{username}, who agreed to talk after a check-in about their post: \
\"{post}\"\n\nThey may be dealing with: {concerns}\n\n\
Write a warm spoken greeting of two or three sentences. Say that you are an automated support \
assistant, not a therapist, that you saw their post, and that you are here to listen.",
            post = truncate_chars(original_post, GREETING_POST_CHARS),
        );

        let request = CompletionRequest::new(GREETING_SYSTEM_PROMPT, prompt)
            .temperature(0.7)
            .max_tokens(150);

        match self.deps.ai.complete(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => fallback_greeting(username),
            Err(e) => {
                tracing::error!(username, error = %e, "Error generating greeting");
                fallback_greeting(username)
            }
        }
    }
}

pub fn fallback_greeting(username: &str) -> String {
    format!(
        "Hi {}, I saw your post and wanted to reach out. I'm here to listen if you'd like to talk.",
        username
    )
}

fn analyze_context<'a>(conversation: &'a Conversation, user_message: &'a str) -> ConversationState<'a> {
    ConversationState {
        conversation,
        user_message,
        relevant_memories: Vec::new(),
        response: String::new(),
    }
}

/// Prompt context: support snippets, a few memories and the latest turns.
pub fn build_context(
    resources: &[SupportResource],
    memories: &[MemoryEntry],
    turns: &[ChatTurn],
) -> String {
    let mut parts = Vec::new();

    if !resources.is_empty() {
        parts.push("Support resources:".to_string());
        parts.extend(resources.iter().map(|r| format!("- {}", r.text)));
    }

    if !memories.is_empty() {
        parts.push("\nRelevant past conversations:".to_string());
        parts.extend(
            memories
                .iter()
                .take(CONTEXT_MEMORIES)
                .map(|m| format!("- {}", truncate_chars(&m.text, SNIPPET_CHARS))),
        );
    }

    if !turns.is_empty() {
        parts.push("\nRecent conversation:".to_string());
        let start = turns.len().saturating_sub(CONTEXT_TURNS);
        parts.extend(
            turns[start..]
                .iter()
                .map(|t| format!("{}: {}", t.role, truncate_chars(&t.content, SNIPPET_CHARS))),
        );
    }

    parts.join("\n")
}
