use serde::{Deserialize, Serialize};

/// A post as returned by the platform search, normalised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    pub username: String,
    pub name: String,
    pub created_at: Option<String>,
    #[serde(default)]
    pub metrics: PostMetrics,
}

impl Post {
    /// Public URL of the post, addressed through the given handle.
    pub fn url_for(&self, username: &str) -> String {
        format!("https://twitter.com/{}/status/{}", username, self.id)
    }
}

/// Public engagement counters for a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

impl From<x_client::TweetMetrics> for PostMetrics {
    fn from(m: x_client::TweetMetrics) -> Self {
        Self {
            retweet_count: m.retweet_count,
            reply_count: m.reply_count,
            like_count: m.like_count,
            quote_count: m.quote_count,
        }
    }
}

/// Public profile fields for an author. Every field may be absent; an
/// entirely empty value means the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub username: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub profile_url: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        *self == ContactInfo::default()
    }

    pub fn profile_url_for(username: &str) -> String {
        format!("https://twitter.com/{}", username)
    }
}
