//! File-backed bookkeeping of offers, replies and call handoffs.
//!
//! A call is only ever requested after an explicit yes: the reply must
//! contain an affirmative keyword and no refusal keyword.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use super::models::{
    offer_key, CallRecord, OfferRecord, OfferStatus, ResponseAssessment, TrackingData, UserReply,
};
use crate::common::truncate_chars;
use crate::domains::outreach::actions::classify_text;
use crate::kernel::{BaseAI, BaseSupportBackend, CallInitiation, CallRequest};

pub const TRACKING_FILE: &str = "user_responses.json";

/// Offers older than this are no longer considered pending.
pub const OFFER_TTL_DAYS: i64 = 7;

pub const POSITIVE_INDICATORS: &[&str] = &[
    "yes", "sure", "okay", "ok", "talk", "chat", "help", "please", "would like",
];
pub const NEGATIVE_INDICATORS: &[&str] = &["no", "nope", "not", "don't", "can't", "won't", "stop"];

/// Lowercased words, apostrophes kept inside words.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole-word match; multi-word indicators must appear as a phrase.
fn contains_indicator(words: &[String], indicator: &str) -> bool {
    let parts: Vec<&str> = indicator.split_whitespace().collect();
    if parts.is_empty() {
        return false;
    }
    words
        .windows(parts.len())
        .any(|window| window.iter().zip(&parts).all(|(w, p)| w == p))
}

pub fn keyword_consent(text: &str) -> (bool, bool) {
    let words = words(text);
    let has_positive = POSITIVE_INDICATORS
        .iter()
        .any(|i| contains_indicator(&words, i));
    let has_negative = NEGATIVE_INDICATORS
        .iter()
        .any(|i| contains_indicator(&words, i));
    (has_positive, has_negative)
}

pub struct ResponseTracker {
    tracking_file: PathBuf,
    data: TrackingData,
    backend: Arc<dyn BaseSupportBackend>,
}

impl ResponseTracker {
    /// Open the tracker in `storage_path`, creating the directory if needed.
    pub fn open(storage_path: &Path, backend: Arc<dyn BaseSupportBackend>) -> Result<Self> {
        std::fs::create_dir_all(storage_path).with_context(|| {
            format!("Failed to create tracking storage at {}", storage_path.display())
        })?;

        let tracking_file = storage_path.join(TRACKING_FILE);
        let data = Self::load(&tracking_file);

        Ok(Self {
            tracking_file,
            data,
            backend,
        })
    }

    fn load(path: &Path) -> TrackingData {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return TrackingData::default(),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Error loading tracking data");
                return TrackingData::default();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::error!(path = %path.display(), error = %e, "Tracking data is corrupt, starting empty");
            TrackingData::default()
        })
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.tracking_file, json)
            .with_context(|| format!("Failed to save {}", self.tracking_file.display()))
    }

    pub fn data(&self) -> &TrackingData {
        &self.data
    }

    pub fn record_offer_sent(
        &mut self,
        user_id: &str,
        username: &str,
        tweet_id: &str,
        reply_id: &str,
    ) -> Result<()> {
        self.data.offers_sent.insert(
            offer_key(user_id, tweet_id),
            OfferRecord {
                user_id: user_id.to_string(),
                username: username.to_string(),
                tweet_id: tweet_id.to_string(),
                reply_id: reply_id.to_string(),
                timestamp: Utc::now(),
                status: OfferStatus::Pending,
                response: None,
                wants_to_talk: None,
                response_timestamp: None,
            },
        );
        self.save()
    }

    /// Replies to our offers since the last check.
    ///
    /// Reading mentions needs user-context auth on the platform, which this
    /// service does not hold, so nothing is ever returned.
    pub async fn check_user_responses(&self) -> Vec<UserReply> {
        tracing::info!("Checking for replies to outreach offers (reply polling is not available)");
        Vec::new()
    }

    /// Read a reply for consent.
    pub async fn analyze_response(&self, text: &str, ai: &dyn BaseAI) -> ResponseAssessment {
        let (has_positive, has_negative) = keyword_consent(text);
        let model_verdict = classify_text(ai, "", text).await;

        ResponseAssessment {
            has_positive,
            has_negative,
            wants_to_talk: has_positive && !has_negative,
            model_verdict,
        }
    }

    /// Ask the support backend to prepare a call. Returns `None` when there is
    /// no phone number or the backend fails.
    pub async fn initiate_call_for_user(
        &mut self,
        user_id: &str,
        username: &str,
        phone_number: Option<&str>,
        context: Option<serde_json::Value>,
    ) -> Option<CallInitiation> {
        let Some(phone_number) = phone_number.filter(|p| !p.trim().is_empty()) else {
            tracing::warn!(username, "No phone number, cannot initiate call");
            return None;
        };

        let request = CallRequest {
            user_id: user_id.to_string(),
            username: username.to_string(),
            phone_number: phone_number.to_string(),
            context: Some(context.unwrap_or_else(|| serde_json::json!({}))),
        };

        let initiation = match self.backend.initiate_call(&request).await {
            Ok(initiation) => initiation,
            Err(e) => {
                tracing::error!(username, error = %e, "Error initiating call");
                return None;
            }
        };

        let now = Utc::now();
        self.data.calls_initiated.insert(
            format!("{}_{}", user_id, now.timestamp()),
            CallRecord {
                user_id: user_id.to_string(),
                username: username.to_string(),
                conversation_id: initiation.conversation_id.clone(),
                phone_number: phone_number.to_string(),
                timestamp: now,
                status: "initiated".to_string(),
            },
        );
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "Failed to record call initiation");
        }

        tracing::info!(
            username,
            conversation_id = %initiation.conversation_id,
            initial_message = %truncate_chars(&initiation.initial_message, 100),
            "Call initiated"
        );
        Some(initiation)
    }

    /// Offers still awaiting a reply and younger than [`OFFER_TTL_DAYS`].
    pub fn get_pending_offers(&self) -> Vec<OfferRecord> {
        let cutoff = Utc::now() - chrono::Duration::days(OFFER_TTL_DAYS);
        self.data
            .offers_sent
            .values()
            .filter(|o| o.status == OfferStatus::Pending && o.timestamp > cutoff)
            .cloned()
            .collect()
    }

    pub fn mark_offer_responded(
        &mut self,
        user_id: &str,
        tweet_id: &str,
        response: &str,
        wants_to_talk: bool,
    ) -> Result<()> {
        let Some(offer) = self.data.offers_sent.get_mut(&offer_key(user_id, tweet_id)) else {
            return Ok(());
        };

        offer.status = OfferStatus::Responded;
        offer.response = Some(response.to_string());
        offer.wants_to_talk = Some(wants_to_talk);
        offer.response_timestamp = Some(Utc::now());
        self.save()
    }

    /// Record one reply and hand consenting users to the backend.
    pub async fn handle_reply(
        &mut self,
        reply: &UserReply,
        ai: &dyn BaseAI,
    ) -> Result<Option<CallInitiation>> {
        let assessment = self.analyze_response(&reply.text, ai).await;
        self.data.user_responses.insert(
            offer_key(&reply.user_id, &reply.tweet_id),
            serde_json::json!({
                "text": reply.text,
                "assessment": assessment,
                "timestamp": Utc::now(),
            }),
        );
        self.mark_offer_responded(
            &reply.user_id,
            &reply.tweet_id,
            &reply.text,
            assessment.wants_to_talk,
        )?;

        if !assessment.wants_to_talk {
            tracing::info!(username = %reply.username, "Replied but does not want to talk");
            return Ok(None);
        }

        tracing::info!(
            username = %reply.username,
            response = %truncate_chars(&reply.text, 100),
            "User agreed to talk"
        );
        let call = self
            .initiate_call_for_user(
                &reply.user_id,
                &reply.username,
                reply.phone_number.as_deref(),
                reply.context.clone(),
            )
            .await;
        if call.is_none() {
            tracing::warn!(username = %reply.username, "Could not initiate call (phone number may be needed)");
        }
        Ok(call)
    }

    async fn check_once(&mut self, ai: &dyn BaseAI) -> Result<()> {
        for reply in self.check_user_responses().await {
            self.handle_reply(&reply, ai).await?;
        }
        Ok(())
    }

    /// Poll for replies every `interval` until Ctrl-C.
    pub async fn monitor_and_call(&mut self, ai: &dyn BaseAI, interval: Duration) -> Result<()> {
        tracing::info!(interval_secs = interval.as_secs(), "Starting response monitoring");

        loop {
            if let Err(e) = self.check_once(ai).await {
                tracing::error!(error = %e, "Error in monitoring loop");
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Monitoring stopped by user");
                    return Ok(());
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_words_only() {
        // "know" contains "no", "notice" contains "not"
        assert_eq!(keyword_consent("I know, I'll take notice"), (false, false));
        assert_eq!(keyword_consent("Yes please"), (true, false));
        assert_eq!(keyword_consent("no thanks"), (false, true));
    }

    #[test]
    fn contractions_and_phrases() {
        assert_eq!(keyword_consent("I DON\u{2019}T want that"), (false, true));
        assert_eq!(keyword_consent("I would like that"), (true, false));
        assert_eq!(keyword_consent("I would rather like it"), (false, false));
    }

    #[test]
    fn mixed_signals_have_both() {
        assert_eq!(keyword_consent("ok but not now"), (true, true));
    }
}
