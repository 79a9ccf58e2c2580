use thiserror::Error;

pub type Result<T> = std::result::Result<T, XError>;

#[derive(Debug, Error)]
pub enum XError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body carried an `errors` array and no usable data.
    #[error("API reported errors: {0}")]
    Problems(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl XError {
    /// HTTP status of the failed call, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            XError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Operator-facing explanation for the common failure statuses.
    pub fn hint(&self) -> Option<&'static str> {
        match self.status()? {
            401 => Some("Authentication failed. Check the bearer token."),
            400 => Some("Bad request. Check the query syntax and parameters."),
            404 => Some("Resource not found."),
            429 => Some("Rate limit exceeded. Wait before trying again."),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for XError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            XError::Parse(err.to_string())
        } else {
            XError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for XError {
    fn from(err: serde_json::Error) -> Self {
        XError::Parse(err.to_string())
    }
}
