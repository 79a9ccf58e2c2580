use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GROK_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_GROK_MODEL: &str = "grok-4-0709";
pub const DEFAULT_X_BASE_URL: &str = "https://api.x.com/2";

/// LLM endpoint settings shared by every binary.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LlmConfig {
    fn from_env(required: bool) -> Result<Self> {
        let api_key = if required {
            env::var("GROK_API_KEY").context("GROK_API_KEY must be set")?
        } else {
            env::var("GROK_API_KEY").unwrap_or_default()
        };

        Ok(Self {
            api_key,
            base_url: env::var("GROK_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GROK_BASE_URL.to_string()),
            model: env::var("GROK_MODEL").unwrap_or_else(|_| DEFAULT_GROK_MODEL.to_string()),
        })
    }
}

/// Settings for the outreach scan (`monitor` binary).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub x_bearer_token: String,
    pub x_base_url: String,
    pub llm: LlmConfig,
    pub output_dir: PathBuf,
    pub classify_delay: Duration,
    pub draft_delay: Duration,
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            x_bearer_token: env::var("X_API_BEARER_TOKEN")
                .context("X_API_BEARER_TOKEN must be set")?,
            x_base_url: env::var("X_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_X_BASE_URL.to_string()),
            llm: LlmConfig::from_env(true)?,
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            classify_delay: Duration::from_secs(1),
            draft_delay: Duration::from_secs(2),
        })
    }
}

/// Which memory store the backend builds at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryBackend {
    File,
    InMemory,
}

impl MemoryBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "file" => Ok(Self::File),
            "memory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            other => anyhow::bail!("MEMORY_BACKEND must be 'file' or 'memory', got '{}'", other),
        }
    }
}

/// Settings for the voice support backend (`server` binary).
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub port: u16,
    pub llm: LlmConfig,
    pub reports_dir: PathBuf,
    pub memory_backend: MemoryBackend,
    pub memory_storage_path: PathBuf,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8001".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            // The backend still serves health and listings without a key; LLM
            // calls then fall back to their fixed responses.
            llm: LlmConfig::from_env(false)?,
            reports_dir: env::var("REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            memory_backend: MemoryBackend::parse(
                &env::var("MEMORY_BACKEND").unwrap_or_default(),
            )?,
            memory_storage_path: env::var("MEMORY_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./conversation_storage")),
        })
    }
}

/// Settings for the response tracker (`tracker` binary).
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub x_bearer_token: String,
    pub x_base_url: String,
    pub llm: LlmConfig,
    pub backend_url: String,
    pub telephony_url: String,
    pub storage_path: PathBuf,
    pub check_interval: Duration,
}

impl TrackerConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            x_bearer_token: env::var("X_API_BEARER_TOKEN")
                .context("X_API_BEARER_TOKEN must be set")?,
            x_base_url: env::var("X_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_X_BASE_URL.to_string()),
            llm: LlmConfig::from_env(true)?,
            backend_url: env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            telephony_url: env::var("TELEPHONY_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            storage_path: env::var("TRACKING_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./response_tracking")),
            check_interval: Duration::from_secs(300),
        })
    }
}

/// Twilio credentials for `place_call`.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub webhook_url: String,
}

impl TwilioConfig {
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            account_sid: env::var("TWILIO_ACCOUNT_SID")
                .context("TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN must be set")?,
            auth_token: env::var("TWILIO_AUTH_TOKEN")
                .context("TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN must be set")?,
            webhook_url: env::var("TWILIO_WEBHOOK_URL")
                .unwrap_or_else(|_| "https://your-ngrok-domain.ngrok.app/twiml".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_parsing() {
        assert_eq!(MemoryBackend::parse("").unwrap(), MemoryBackend::File);
        assert_eq!(MemoryBackend::parse("FILE").unwrap(), MemoryBackend::File);
        assert_eq!(MemoryBackend::parse("memory").unwrap(), MemoryBackend::InMemory);
        assert!(MemoryBackend::parse("lancedb").is_err());
    }
}
