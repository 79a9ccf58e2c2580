// X (Twitter) implementation of BaseSocialPlatform

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use x_client::{SearchResponse, User, XClient, XError};

use super::BaseSocialPlatform;
use crate::common::{ContactInfo, Post};

pub struct XPlatform {
    client: XClient,
}

impl XPlatform {
    pub fn new(client: XClient) -> Self {
        Self { client }
    }
}

/// Log an X API failure with its status-specific hint.
fn log_x_error(operation: &str, error: &XError, query: Option<&str>) {
    match error.hint() {
        Some(hint) => tracing::error!(operation, status = ?error.status(), query, %error, hint, "X API call failed"),
        None => tracing::error!(operation, status = ?error.status(), query, %error, "X API call failed"),
    }
}

#[async_trait]
impl BaseSocialPlatform for XPlatform {
    async fn search_posts(&self, query: &str, max_results: u32) -> Result<Vec<Post>> {
        let response = self
            .client
            .search_all(query, max_results)
            .await
            .map_err(|e| {
                log_x_error("search", &e, Some(query));
                e
            })?;

        Ok(normalize_search(response))
    }

    async fn find_contact_info(&self, user_id: &str) -> Result<ContactInfo> {
        let user = self.client.get_user(user_id).await.map_err(|e| {
            log_x_error("user_lookup", &e, None);
            e
        })?;

        Ok(contact_from_user(user))
    }
}

/// Join posts with their expanded authors, keeping API order.
pub fn normalize_search(response: SearchResponse) -> Vec<Post> {
    let users: HashMap<String, User> = response
        .includes
        .users
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    response
        .data
        .into_iter()
        .map(|tweet| {
            let author = tweet.author_id.as_ref().and_then(|id| users.get(id));
            Post {
                id: tweet.id,
                text: tweet.text,
                username: author
                    .and_then(|u| u.username.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                name: author
                    .and_then(|u| u.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                author_id: tweet.author_id,
                created_at: tweet.created_at,
                metrics: tweet.public_metrics.map(Into::into).unwrap_or_default(),
            }
        })
        .collect()
}

pub fn contact_from_user(user: User) -> ContactInfo {
    let profile_url = user.username.as_deref().map(ContactInfo::profile_url_for);
    ContactInfo {
        username: user.username,
        name: user.name,
        description: Some(user.description.unwrap_or_default()),
        location: user.location,
        url: user.url,
        profile_url,
    }
}
