//! Pure X (Twitter) API v2 REST client.
//!
//! Covers the three read endpoints the monitor needs: full-archive search with
//! author expansion, user lookup, and trends by WOEID. Authentication is an
//! app-only bearer token.
//!
//! # Example
//!
//! ```rust,ignore
//! use x_client::XClient;
//!
//! let client = XClient::new(std::env::var("X_API_BEARER_TOKEN")?);
//! let page = client.search_all("lang:en -is:retweet", 10).await?;
//! for tweet in &page.data {
//!     println!("{}", tweet.text);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, XError};
pub use types::{
    ApiProblem, Includes, SearchResponse, Trend, TrendsResponse, Tweet, TweetMetrics, User,
    UserMetrics, UserResponse,
};

use std::time::Duration;

use serde::de::DeserializeOwned;
use types::ErrorBody;

pub const DEFAULT_BASE_URL: &str = "https://api.x.com/2";

const SEARCH_TWEET_FIELDS: &str = "created_at,author_id,public_metrics,text";
const SEARCH_USER_FIELDS: &str = "username,name,description,public_metrics";
const LOOKUP_USER_FIELDS: &str = "username,name,description,public_metrics,location,url";

#[derive(Clone)]
pub struct XClient {
    client: reqwest::Client,
    bearer_token: String,
    base_url: String,
}

impl XClient {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            bearer_token: bearer_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full-archive search with the author expansion.
    ///
    /// `max_results` is passed through unchanged; the API rejects values
    /// outside 10..=100 for this endpoint with a 400.
    pub async fn search_all(&self, query: &str, max_results: u32) -> Result<SearchResponse> {
        let max_results = max_results.to_string();
        let params = [
            ("query", query),
            ("max_results", max_results.as_str()),
            ("tweet.fields", SEARCH_TWEET_FIELDS),
            ("user.fields", SEARCH_USER_FIELDS),
            ("expansions", "author_id"),
        ];

        let resp: SearchResponse = self.get("tweets/search/all", &params).await?;

        if !resp.errors.is_empty() {
            let messages: Vec<String> = resp.errors.iter().map(ApiProblem::summary).collect();
            return Err(XError::Problems(messages.join(", ")));
        }

        tracing::debug!(count = resp.data.len(), "Search returned posts");
        Ok(resp)
    }

    /// Look up a single user's public profile.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let path = format!("users/{}", user_id);
        let resp: UserResponse = self
            .get(&path, &[("user.fields", LOOKUP_USER_FIELDS)])
            .await?;

        match resp.data {
            Some(user) => Ok(user),
            None => {
                let messages: Vec<String> = resp.errors.iter().map(ApiProblem::summary).collect();
                Err(XError::Problems(if messages.is_empty() {
                    format!("user {} not returned", user_id)
                } else {
                    messages.join(", ")
                }))
            }
        }
    }

    /// Trending topics for a location. API-level `errors` are returned to the
    /// caller alongside any data rather than treated as failure.
    pub async fn trends_by_woeid(
        &self,
        woeid: i64,
        max_trends: u32,
        trend_fields: &[&str],
    ) -> Result<TrendsResponse> {
        let path = format!("trends/by/woeid/{}", woeid);
        let max_trends = max_trends.to_string();
        let fields = trend_fields.join(",");

        let mut params = vec![("max_trends", max_trends.as_str())];
        if !trend_fields.is_empty() {
            params.push(("trend.fields", fields.as_str()));
        }

        self.get(&path, &params).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(url = %url, ?params, "X API request");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(XError::Api {
                status: status.as_u16(),
                message: describe_error_body(&body),
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Collapse an error body into one line, preferring the structured problems.
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .iter()
            .map(ApiProblem::summary)
            .collect::<Vec<_>>()
            .join("; "),
        Ok(ErrorBody {
            detail: Some(detail),
            ..
        }) => detail,
        Ok(ErrorBody {
            title: Some(title), ..
        }) => title,
        _ => body.chars().take(500).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_with_problem_list() {
        let body = r#"{"errors":[{"message":"Invalid query","code":400}]}"#;
        assert_eq!(describe_error_body(body), "Invalid query (code 400)");
    }

    #[test]
    fn error_body_with_problem_details() {
        let body = r#"{"title":"Unauthorized","detail":"Unauthorized","type":"about:blank","status":401}"#;
        assert_eq!(describe_error_body(body), "Unauthorized");
    }

    #[test]
    fn error_body_plain_text_is_truncated() {
        let body = "x".repeat(900);
        assert_eq!(describe_error_body(&body).len(), 500);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = XClient::new("token").with_base_url("http://localhost:9999/2/");
        assert_eq!(client.base_url(), "http://localhost:9999/2");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let client = XClient::new("token").with_base_url("http://127.0.0.1:1/2");
        let err = client.search_all("lang:en", 10).await.unwrap_err();
        assert!(matches!(err, XError::Network(_)));
    }
}
