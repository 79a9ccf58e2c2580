use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::SentimentVerdict;
use crate::common::{ContactInfo, Post};

/// One drafted outreach message, queued for human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachRecord {
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub profile_url: Option<String>,
    pub original_post: String,
    pub post_url: Option<String>,
    pub sentiment_analysis: SentimentVerdict,
    pub support_message: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    pub timestamp: String,
}

impl OutreachRecord {
    pub fn new(
        post: &Post,
        verdict: SentimentVerdict,
        contact: ContactInfo,
        support_message: String,
    ) -> Self {
        // A failed profile lookup still leaves the handle from the search expansion
        let handle = contact
            .username
            .clone()
            .unwrap_or_else(|| post.username.clone());

        let post_url = (!post.id.is_empty()).then(|| post.url_for(&handle));

        Self {
            username: Some(handle),
            user_id: post.author_id.clone(),
            profile_url: contact.profile_url.clone(),
            original_post: post.text.clone(),
            post_url,
            sentiment_analysis: verdict,
            support_message,
            contact_info: contact,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Contents of a `support_outreach_*.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachReport {
    pub scan_timestamp: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub total_posts_scanned: usize,
    #[serde(default)]
    pub negative_posts_found: usize,
    #[serde(default)]
    pub results: Vec<OutreachRecord>,
}
