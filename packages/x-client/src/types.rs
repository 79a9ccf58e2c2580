use serde::{Deserialize, Serialize};

/// Response of `GET /2/tweets/search/*`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<Tweet>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub author_id: Option<String>,
    pub created_at: Option<String>,
    pub public_metrics: Option<TweetMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impression_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub public_metrics: Option<UserMetrics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
    #[serde(default)]
    pub listed_count: u64,
}

/// Response of `GET /2/users/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub data: Option<User>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

/// Response of `GET /2/trends/by/woeid/:woeid`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendsResponse {
    #[serde(default)]
    pub data: Vec<Trend>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub trend_name: Option<String>,
    pub tweet_count: Option<u64>,
}

/// Problem object found in `errors` arrays and in non-2xx bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiProblem {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl ApiProblem {
    pub fn summary(&self) -> String {
        let text = self
            .message
            .as_deref()
            .or(self.detail.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("Unknown error");
        match self.code {
            Some(code) => format!("{} (code {})", text, code),
            None => text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_with_expansions() {
        let body = r#"{
            "data": [{"id": "1", "text": "hello", "author_id": "42",
                      "created_at": "2024-01-01T00:00:00.000Z",
                      "public_metrics": {"retweet_count": 1, "reply_count": 2, "like_count": 3, "quote_count": 0}}],
            "includes": {"users": [{"id": "42", "username": "alice", "name": "Alice"}]},
            "meta": {"result_count": 1}
        }"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].public_metrics.as_ref().unwrap().like_count, 3);
        assert_eq!(resp.includes.users[0].username.as_deref(), Some("alice"));
        assert!(resp.errors.is_empty());
    }

    #[test]
    fn empty_search_response() {
        let resp: SearchResponse = serde_json::from_str(r#"{"meta":{"result_count":0}}"#).unwrap();
        assert!(resp.data.is_empty());
        assert!(resp.includes.users.is_empty());
    }

    #[test]
    fn problem_summary_prefers_message() {
        let problem = ApiProblem {
            code: Some(88),
            message: Some("Rate limit".into()),
            detail: Some("ignored".into()),
            ..Default::default()
        };
        assert_eq!(problem.summary(), "Rate limit (code 88)");

        let problem = ApiProblem {
            title: Some("Not Found Error".into()),
            ..Default::default()
        };
        assert_eq!(problem.summary(), "Not Found Error");
    }
}
