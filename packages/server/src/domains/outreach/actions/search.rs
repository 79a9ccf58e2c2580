//! Post search and author lookup with empty fallbacks.

use crate::common::{ContactInfo, Post};
use crate::kernel::BaseSocialPlatform;

/// Recent English posts, no retweets.
pub const DEFAULT_QUERY: &str = "lang:en -is:retweet";

pub const MIN_SEARCH_RESULTS: u32 = 10;
pub const MAX_SEARCH_RESULTS: u32 = 100;

/// Trimmed query, or [`DEFAULT_QUERY`] when nothing is left.
pub fn default_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Clamp a requested cap into the range the search endpoint accepts.
pub fn clamp_max_results(requested: i64) -> u32 {
    requested.clamp(MIN_SEARCH_RESULTS as i64, MAX_SEARCH_RESULTS as i64) as u32
}

/// Search posts. Any failure is logged and yields an empty list.
pub async fn search_posts(
    platform: &dyn BaseSocialPlatform,
    query: &str,
    max_results: i64,
) -> Vec<Post> {
    let query = default_query(query);
    let max_results = clamp_max_results(max_results);

    match platform.search_posts(&query, max_results).await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "Search failed, continuing with no posts");
            Vec::new()
        }
    }
}

/// Public profile of an author. Failures yield an empty `ContactInfo`.
pub async fn find_contact_info(
    platform: &dyn BaseSocialPlatform,
    author_id: Option<&str>,
) -> ContactInfo {
    let Some(author_id) = author_id else {
        return ContactInfo::default();
    };

    match platform.find_contact_info(author_id).await {
        Ok(contact) => contact,
        Err(e) => {
            tracing::warn!(author_id, error = %e, "Profile lookup failed");
            ContactInfo::default()
        }
    }
}
