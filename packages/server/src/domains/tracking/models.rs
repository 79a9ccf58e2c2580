use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::outreach::SentimentVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Responded,
}

/// An outreach offer posted to a user, keyed `"{user_id}_{tweet_id}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRecord {
    pub user_id: String,
    pub username: String,
    pub tweet_id: String,
    pub reply_id: String,
    pub timestamp: DateTime<Utc>,
    pub status: OfferStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wants_to_talk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_timestamp: Option<DateTime<Utc>>,
}

/// A call handed to the support backend, keyed `"{user_id}_{unix_secs}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub user_id: String,
    pub username: String,
    pub conversation_id: String,
    pub phone_number: String,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

/// Contents of `user_responses.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingData {
    #[serde(default)]
    pub offers_sent: BTreeMap<String, OfferRecord>,
    #[serde(default)]
    pub user_responses: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub calls_initiated: BTreeMap<String, CallRecord>,
}

pub fn offer_key(user_id: &str, tweet_id: &str) -> String {
    format!("{}_{}", user_id, tweet_id)
}

/// A reply from a user to one of our offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReply {
    pub user_id: String,
    pub username: String,
    pub tweet_id: String,
    pub text: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// How a reply was read. Only the keyword result decides `wants_to_talk`;
/// the model verdict is kept for the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseAssessment {
    pub has_positive: bool,
    pub has_negative: bool,
    pub wants_to_talk: bool,
    pub model_verdict: SentimentVerdict,
}
