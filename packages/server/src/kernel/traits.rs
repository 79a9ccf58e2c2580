// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Prompts, verdict parsing and fallbacks live in the domains that use them.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseMemoryStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{
    ContactInfo, ConversationRecord, MemoryEntry, Post, SupportResource, UserMemory,
};

// =============================================================================
// AI Trait (chat completion)
// =============================================================================

/// A single system + user prompt with sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.7,
            max_tokens: 300,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Run a chat completion and return the raw text of the first choice
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

// =============================================================================
// Social Platform Trait (search + profile lookup)
// =============================================================================

#[async_trait]
pub trait BaseSocialPlatform: Send + Sync {
    /// Search recent posts; `max_results` is sent as given
    async fn search_posts(&self, query: &str, max_results: u32) -> Result<Vec<Post>>;

    /// Public profile fields for an author id
    async fn find_contact_info(&self, user_id: &str) -> Result<ContactInfo>;
}

// =============================================================================
// Memory Store Trait (per-user long-term memory + call history)
// =============================================================================

#[async_trait]
pub trait BaseMemoryStore: Send + Sync {
    fn is_ready(&self) -> bool;

    async fn get_user_memory(&self, user_id: &str) -> Result<UserMemory>;

    async fn add_memory(
        &self,
        user_id: &str,
        text: &str,
        metadata: serde_json::Value,
    ) -> Result<()>;

    /// Append a turn to the user's open conversation. Substantial user turns
    /// are also stored as memories.
    async fn add_message(&self, user_id: &str, role: &str, content: &str) -> Result<()>;

    async fn search_memories(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>>;

    /// Most recent `limit` conversations, oldest first
    async fn get_conversation_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationRecord>>;
}

// =============================================================================
// Context Retriever Trait (RAG)
// =============================================================================

#[async_trait]
pub trait BaseContextRetriever: Send + Sync {
    fn is_ready(&self) -> bool;

    async fn get_relevant_context(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SupportResource>>;

    async fn add_user_context(
        &self,
        user_id: &str,
        text: &str,
        metadata: serde_json::Value,
    ) -> Result<()>;
}

// =============================================================================
// Support Backend Trait (tracker -> voice backend handoff)
// =============================================================================

/// Body of `POST /api/calls/initiate`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallRequest {
    pub user_id: String,
    pub username: String,
    pub phone_number: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// Successful reply of `POST /api/calls/initiate`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallInitiation {
    pub conversation_id: String,
    pub initial_message: String,
    pub phone_number: String,
    pub status: String,
}

#[async_trait]
pub trait BaseSupportBackend: Send + Sync {
    async fn initiate_call(&self, request: &CallRequest) -> Result<CallInitiation>;
}
