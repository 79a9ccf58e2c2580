// HTTP implementation of BaseSupportBackend (tracker -> voice backend)

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{BaseSupportBackend, CallInitiation, CallRequest};

pub struct HttpSupportBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSupportBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BaseSupportBackend for HttpSupportBackend {
    async fn initiate_call(&self, request: &CallRequest) -> Result<CallInitiation> {
        let url = format!("{}/api/calls/initiate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to reach support backend at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Support backend returned {}: {}", status, body);
        }

        response
            .json::<CallInitiation>()
            .await
            .context("Failed to parse call initiation response")
    }
}
