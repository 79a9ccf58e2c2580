//! Minimal client for OpenAI-compatible chat completion APIs.
//!
//! Defaults to the xAI endpoint, which speaks the same wire format as OpenAI.
//!
//! # Example
//!
//! ```rust,ignore
//! use chat_client::{ChatClient, ChatRequest, Message};
//!
//! let client = ChatClient::from_env()?;
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new("grok-4-0709")
//!             .message(Message::system("You are concise."))
//!             .message(Message::user("Hello!"))
//!             .temperature(0.3)
//!             .max_tokens(100),
//!     )
//!     .await?;
//! println!("{}", response.content);
//! ```

pub mod error;
pub mod types;

pub use error::{ChatError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat completion client authenticated with a bearer API key.
#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `GROK_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROK_API_KEY")
            .map_err(|_| ChatError::Config("GROK_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a chat completion and return the first choice's text.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                ChatError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "Chat completion API error");
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| ChatError::Parse("response contained no choices".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: raw.usage,
        })
    }
}
