//! Server dependencies (using traits for testability)
//!
//! Every external capability is a trait object chosen once at startup. Nothing
//! downstream checks which implementation it got.

use std::sync::Arc;

use anyhow::Result;

use crate::config::BackendConfig;
use crate::kernel::{
    create_memory_store, BaseAI, BaseContextRetriever, BaseMemoryStore, GrokAI,
    KeywordContextRetriever,
};

#[derive(Clone)]
pub struct ServerDeps {
    pub ai: Arc<dyn BaseAI>,
    pub memory: Arc<dyn BaseMemoryStore>,
    pub retriever: Arc<dyn BaseContextRetriever>,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        memory: Arc<dyn BaseMemoryStore>,
        retriever: Arc<dyn BaseContextRetriever>,
    ) -> Self {
        Self {
            ai,
            memory,
            retriever,
        }
    }

    /// Build the production dependency set from configuration.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        if config.llm.api_key.is_empty() {
            tracing::warn!("GROK_API_KEY not set; generated replies will use fixed fallbacks");
        }

        let ai: Arc<dyn BaseAI> = Arc::new(GrokAI::from_config(&config.llm));
        let memory = create_memory_store(config.memory_backend, &config.memory_storage_path)?;
        let retriever: Arc<dyn BaseContextRetriever> = Arc::new(KeywordContextRetriever::new());

        Ok(Self::new(ai, memory, retriever))
    }
}
