// Chat completion implementation of BaseAI
//
// Infrastructure only. What to prompt for lives in the domain layers.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chat_client::{ChatClient, ChatRequest, Message};

use super::{BaseAI, CompletionRequest};
use crate::config::LlmConfig;

/// BaseAI over an OpenAI-compatible endpoint (xAI Grok by default)
#[derive(Clone)]
pub struct GrokAI {
    client: ChatClient,
    model: String,
}

impl GrokAI {
    pub fn new(client: ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        let client = ChatClient::new(config.api_key.clone()).with_base_url(config.base_url.clone());
        Self::new(client, config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl BaseAI for GrokAI {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            prompt_length = request.user.len(),
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "Calling chat completion"
        );

        let chat = ChatRequest::new(self.model.clone())
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .temperature(request.temperature)
            .max_tokens(request.max_tokens);

        let response = self
            .client
            .chat_completion(chat)
            .await
            .context("Chat completion failed")?;

        if let Some(usage) = &response.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "Chat completion usage");
        }

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_uses_configured_model() {
        let ai = GrokAI::from_config(&LlmConfig {
            api_key: "key".into(),
            base_url: "http://localhost:1/v1".into(),
            model: "grok-test".into(),
        });
        assert_eq!(ai.model(), "grok-test");
    }

    #[tokio::test]
    async fn network_failure_is_an_error() {
        let ai = GrokAI::from_config(&LlmConfig {
            api_key: "key".into(),
            base_url: "http://127.0.0.1:1/v1".into(),
            model: "grok-test".into(),
        });
        let result = ai.complete(CompletionRequest::new("sys", "hi")).await;
        assert!(result.is_err());
    }
}
