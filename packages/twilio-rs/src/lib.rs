//! Outbound voice calls through the Twilio Programmable Voice REST API.

use std::collections::HashMap;

pub mod models;

use reqwest::{header, Client};
use thiserror::Error;

use crate::models::{CallResponse, TwilioErrorBody};

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("Request to Twilio failed: {0}")]
    Network(String),

    #[error("Twilio error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse Twilio response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    base_url: String,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            base_url: API_BASE.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Dial `to` from `from`; Twilio fetches call instructions from `webhook_url`
    /// once the callee answers.
    pub async fn create_call(
        &self,
        to: &str,
        from: &str,
        webhook_url: &str,
    ) -> Result<CallResponse, TwilioError> {
        let url = format!(
            "{base}/Accounts/{sid}/Calls.json",
            base = self.base_url,
            sid = self.options.account_sid
        );

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", to);
        form_body.insert("From", from);
        form_body.insert("Url", webhook_url);

        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .header(header::ACCEPT, "application/json")
            .form(&form_body)
            .send()
            .await
            .map_err(|e| TwilioError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);
            tracing::warn!(status = %status, error = %message, "Twilio returned an error");
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CallResponse>()
            .await
            .map_err(|e| TwilioError::Parse(e.to_string()))
    }
}

/// Append `key=value` to a URL, choosing `?` or `&` depending on whether a
/// query string is already present. The value is percent-encoded.
pub fn append_query_param(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    let encoded = urlencoding::encode(value);
    format!("{}{}{}={}", url, separator, key, encoded)
}
