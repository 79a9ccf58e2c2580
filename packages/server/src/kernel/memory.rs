// Memory store implementations
//
// `FileMemoryStore` keeps one memory file and one history file per user.
// `InMemoryMemoryStore` keeps the same shapes in process and forgets them on
// restart. The backend picks one at startup via `create_memory_store`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use super::BaseMemoryStore;
use crate::common::{ChatTurn, ConversationHistory, ConversationRecord, MemoryEntry, UserMemory};
use crate::config::MemoryBackend;

/// User turns at or below this length are kept in history but not remembered.
pub const MIN_MEMORABLE_CHARS: usize = 20;

pub fn create_memory_store(
    backend: MemoryBackend,
    storage_path: &Path,
) -> Result<Arc<dyn BaseMemoryStore>> {
    match backend {
        MemoryBackend::File => {
            tracing::info!(path = %storage_path.display(), "Using file-backed memory store");
            Ok(Arc::new(FileMemoryStore::new(storage_path)?))
        }
        MemoryBackend::InMemory => {
            tracing::info!("Using in-process memory store");
            Ok(Arc::new(InMemoryMemoryStore::new()))
        }
    }
}

// =============================================================================
// Shared record manipulation
// =============================================================================

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

fn push_memory(memory: &mut UserMemory, text: &str, metadata: serde_json::Value) {
    memory.memories.push(MemoryEntry {
        text: text.to_string(),
        timestamp: now_iso(),
        metadata,
    });
    memory.count = memory.memories.len();
}

/// Append to the open conversation, opening a new one after an ended call.
fn push_turn(history: &mut ConversationHistory, turn: ChatTurn) {
    let needs_new = history
        .conversations
        .last()
        .map(|c| c.ended)
        .unwrap_or(true);

    if needs_new {
        history.conversations.push(ConversationRecord {
            started_at: turn.timestamp.clone(),
            messages: Vec::new(),
            ended: false,
        });
    }

    if let Some(current) = history.conversations.last_mut() {
        current.messages.push(turn);
    }
}

fn memorable_turn(role: &str, content: &str) -> Option<(String, serde_json::Value)> {
    (role == "user" && content.chars().count() > MIN_MEMORABLE_CHARS).then(|| {
        (
            format!("User said: {}", content),
            serde_json::json!({ "role": role, "timestamp": now_iso() }),
        )
    })
}

/// Case-insensitive substring containment, first `limit` hits.
pub fn search_entries(memories: &[MemoryEntry], query: &str, limit: usize) -> Vec<MemoryEntry> {
    let needle = query.to_lowercase();
    memories
        .iter()
        .filter(|m| m.text.to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect()
}

fn last_conversations(history: ConversationHistory, limit: usize) -> Vec<ConversationRecord> {
    let mut conversations = history.conversations;
    if limit > 0 && conversations.len() > limit {
        conversations.drain(..conversations.len() - limit);
    }
    conversations
}

/// Keep ids usable as file names: anything outside `[A-Za-z0-9_-]` becomes `_`.
pub fn sanitize_user_id(user_id: &str) -> String {
    let cleaned: String = user_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

// =============================================================================
// File-backed store
// =============================================================================

pub struct FileMemoryStore {
    storage_path: PathBuf,
}

impl FileMemoryStore {
    pub fn new(storage_path: impl Into<PathBuf>) -> Result<Self> {
        let storage_path = storage_path.into();
        std::fs::create_dir_all(&storage_path).with_context(|| {
            format!("Failed to create memory storage at {}", storage_path.display())
        })?;
        Ok(Self { storage_path })
    }

    fn memory_file(&self, user_id: &str) -> PathBuf {
        self.storage_path
            .join(format!("{}_memory.json", sanitize_user_id(user_id)))
    }

    fn history_file(&self, user_id: &str) -> PathBuf {
        self.storage_path
            .join(format!("{}_history.json", sanitize_user_id(user_id)))
    }

    async fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
        match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Corrupt JSON in {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn write<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[async_trait]
impl BaseMemoryStore for FileMemoryStore {
    fn is_ready(&self) -> bool {
        true
    }

    async fn get_user_memory(&self, user_id: &str) -> Result<UserMemory> {
        Self::read_or_default(&self.memory_file(user_id)).await
    }

    async fn add_memory(
        &self,
        user_id: &str,
        text: &str,
        metadata: serde_json::Value,
    ) -> Result<()> {
        let path = self.memory_file(user_id);
        let mut memory: UserMemory = Self::read_or_default(&path).await?;
        push_memory(&mut memory, text, metadata);
        Self::write(&path, &memory).await
    }

    async fn add_message(&self, user_id: &str, role: &str, content: &str) -> Result<()> {
        let path = self.history_file(user_id);
        let mut history: ConversationHistory = Self::read_or_default(&path).await?;
        push_turn(
            &mut history,
            ChatTurn {
                role: role.to_string(),
                content: content.to_string(),
                timestamp: now_iso(),
            },
        );
        Self::write(&path, &history).await?;

        if let Some((text, metadata)) = memorable_turn(role, content) {
            self.add_memory(user_id, &text, metadata).await?;
        }
        Ok(())
    }

    async fn search_memories(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>> {
        let memory = self.get_user_memory(user_id).await?;
        Ok(search_entries(&memory.memories, query, limit))
    }

    async fn get_conversation_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationRecord>> {
        let history: ConversationHistory =
            Self::read_or_default(&self.history_file(user_id)).await?;
        Ok(last_conversations(history, limit))
    }
}

// =============================================================================
// In-process store
// =============================================================================

#[derive(Default)]
struct UserRecords {
    memory: UserMemory,
    history: ConversationHistory,
}

#[derive(Default)]
pub struct InMemoryMemoryStore {
    users: RwLock<HashMap<String, UserRecords>>,
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseMemoryStore for InMemoryMemoryStore {
    fn is_ready(&self) -> bool {
        true
    }

    async fn get_user_memory(&self, user_id: &str) -> Result<UserMemory> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|r| r.memory.clone())
            .unwrap_or_default())
    }

    async fn add_memory(
        &self,
        user_id: &str,
        text: &str,
        metadata: serde_json::Value,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let records = users.entry(user_id.to_string()).or_default();
        push_memory(&mut records.memory, text, metadata);
        Ok(())
    }

    async fn add_message(&self, user_id: &str, role: &str, content: &str) -> Result<()> {
        let mut users = self.users.write().await;
        let records = users.entry(user_id.to_string()).or_default();
        push_turn(
            &mut records.history,
            ChatTurn {
                role: role.to_string(),
                content: content.to_string(),
                timestamp: now_iso(),
            },
        );
        if let Some((text, metadata)) = memorable_turn(role, content) {
            push_memory(&mut records.memory, &text, metadata);
        }
        Ok(())
    }

    async fn search_memories(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|r| search_entries(&r.memory.memories, query, limit))
            .unwrap_or_default())
    }

    async fn get_conversation_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationRecord>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|r| last_conversations(r.history.clone(), limit))
            .unwrap_or_default())
    }
}
