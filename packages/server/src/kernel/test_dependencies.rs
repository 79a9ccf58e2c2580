// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps, the outreach
// pipeline and the response tracker.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    BaseAI, BaseContextRetriever, BaseMemoryStore, BaseSocialPlatform, BaseSupportBackend,
    CallInitiation, CallRequest, CompletionRequest, InMemoryMemoryStore, KeywordContextRetriever,
    ServerDeps,
};
use crate::common::{ContactInfo, Post};

// =============================================================================
// Mock AI
// =============================================================================

/// Scripted chat completions.
///
/// Rules are checked in insertion order against the user prompt; the first
/// rule whose needle is contained wins. Unmatched prompts get the default
/// response, or an error when none is set.
pub struct MockAI {
    rules: Mutex<Vec<(String, std::result::Result<String, String>)>>,
    default_response: Mutex<Option<String>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call fails as a transport error would.
    pub fn failing() -> Self {
        Self::new()
    }

    pub fn with_default(self, response: &str) -> Self {
        *self.default_response.lock().unwrap() = Some(response.to_string());
        self
    }

    pub fn when_prompt_contains(self, needle: &str, response: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Ok(response.to_string())));
        self
    }

    pub fn fail_when_prompt_contains(self, needle: &str, error: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Err(error.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());

        let matched = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| request.user.contains(needle.as_str()))
            .map(|(_, response)| response.clone());

        match matched {
            Some(Ok(text)) => Ok(text),
            Some(Err(error)) => Err(anyhow::anyhow!(error)),
            None => match self.default_response.lock().unwrap().clone() {
                Some(text) => Ok(text),
                None => Err(anyhow::anyhow!("connection refused")),
            },
        }
    }
}

// =============================================================================
// Mock Social Platform
// =============================================================================

pub struct MockSocialPlatform {
    posts: Vec<Post>,
    contacts: HashMap<String, ContactInfo>,
    fail_search: bool,
    searches: Arc<Mutex<Vec<(String, u32)>>>,
    lookups: Arc<Mutex<Vec<String>>>,
}

impl MockSocialPlatform {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            contacts: HashMap::new(),
            fail_search: false,
            searches: Arc::new(Mutex::new(Vec::new())),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_posts(mut self, posts: Vec<Post>) -> Self {
        self.posts = posts;
        self
    }

    /// Lookups for ids without a contact fail.
    pub fn with_contact(mut self, user_id: &str, contact: ContactInfo) -> Self {
        self.contacts.insert(user_id.to_string(), contact);
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn searches(&self) -> Vec<(String, u32)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Default for MockSocialPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSocialPlatform for MockSocialPlatform {
    async fn search_posts(&self, query: &str, max_results: u32) -> Result<Vec<Post>> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        if self.fail_search {
            anyhow::bail!("API error (status 401): Unauthorized");
        }
        Ok(self.posts.clone())
    }

    async fn find_contact_info(&self, user_id: &str) -> Result<ContactInfo> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        self.contacts
            .get(user_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("API error (status 404): user {} not found", user_id))
    }
}

// =============================================================================
// Mock Support Backend
// =============================================================================

pub struct MockSupportBackend {
    fail: bool,
    requests: Arc<Mutex<Vec<CallRequest>>>,
}

impl MockSupportBackend {
    pub fn new() -> Self {
        Self {
            fail: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn requests(&self) -> Vec<CallRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockSupportBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSupportBackend for MockSupportBackend {
    async fn initiate_call(&self, request: &CallRequest) -> Result<CallInitiation> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            anyhow::bail!("Support backend returned 500 Internal Server Error");
        }
        Ok(CallInitiation {
            conversation_id: format!("conv_{}_test", request.user_id),
            initial_message: format!("Hi {}, this is an automated support line.", request.username),
            phone_number: request.phone_number.clone(),
            status: "ready".to_string(),
        })
    }
}

// =============================================================================
// Test dependency bundle
// =============================================================================

/// ServerDeps wired with a MockAI, the in-process memory store and the
/// keyword retriever.
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub memory: Arc<dyn BaseMemoryStore>,
    pub retriever: Arc<dyn BaseContextRetriever>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::with_ai(MockAI::new())
    }

    pub fn with_ai(ai: MockAI) -> Self {
        Self {
            ai: Arc::new(ai),
            memory: Arc::new(InMemoryMemoryStore::new()),
            retriever: Arc::new(KeywordContextRetriever::new()),
        }
    }

    pub fn with_memory(mut self, memory: Arc<dyn BaseMemoryStore>) -> Self {
        self.memory = memory;
        self
    }

    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(self.ai.clone(), self.memory.clone(), self.retriever.clone())
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
