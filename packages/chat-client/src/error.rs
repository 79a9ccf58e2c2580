//! Error types for the chat completion client.

use thiserror::Error;

/// Result type for chat client operations.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Chat client errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the provider
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ChatError::Parse(e.to_string())
        } else {
            ChatError::Network(e.to_string())
        }
    }
}
