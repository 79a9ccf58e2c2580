//! Sentiment classification of posts through the LLM.
//!
//! The model is asked for a JSON object. Replies that are not valid JSON are
//! salvaged heuristically rather than discarded, and transport failures
//! produce a verdict that never triggers outreach.

use crate::common::{truncate_chars, Post};
use crate::domains::outreach::models::SentimentVerdict;
use crate::kernel::{BaseAI, CompletionRequest};

const CLASSIFY_SYSTEM_PROMPT: &str = "You are a compassionate mental health awareness assistant. \
Read posts carefully and identify the ones whose authors may need support.";

const CLASSIFY_TEMPERATURE: f32 = 0.3;
const CLASSIFY_MAX_TOKENS: u32 = 500;

/// Characters of a non-JSON reply kept as the heuristic reasoning.
const REASONING_CHARS: usize = 200;

fn classify_prompt(username: &str, text: &str) -> String {
    let handle = if username.is_empty() { "user" } else { username };
    format!(
        r#"Assess the sentiment of this social media post. Decide whether it expresses negative thoughts, depression, anxiety, or distress, taking context into account.

Post by @{handle}: {text}

Reply with JSON only:
{{
    "is_negative": true/false,
    "sentiment": "positive/negative/neutral",
    "severity": "low/medium/high",
    "concerns": ["list", "of", "concerns"],
    "needs_support": true/false,
    "reasoning": "brief explanation"
}}"#
    )
}

/// The JSON candidate inside a reply: the first ```` ```json ```` block, else
/// the first plain fenced block, else the whole reply.
pub fn extract_json_block(content: &str) -> &str {
    if let Some(rest) = content.split_once("```json").map(|(_, rest)| rest) {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    if let Some(rest) = content.split_once("```").map(|(_, rest)| rest) {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    content
}

/// Verdict guessed from free text when the model did not return JSON.
pub fn heuristic_verdict(content: &str) -> SentimentVerdict {
    let lower = content.to_lowercase();
    let mentions_negative = lower.contains("negative");

    SentimentVerdict {
        is_negative: mentions_negative || lower.contains("true"),
        sentiment: if mentions_negative { "negative" } else { "neutral" }.to_string(),
        severity: "medium".to_string(),
        concerns: Vec::new(),
        needs_support: true,
        reasoning: truncate_chars(content, REASONING_CHARS).to_string(),
    }
}

/// Verdict used when the LLM could not be reached at all.
pub fn error_verdict(error: &anyhow::Error) -> SentimentVerdict {
    SentimentVerdict {
        is_negative: false,
        sentiment: "unknown".to_string(),
        severity: "low".to_string(),
        concerns: Vec::new(),
        needs_support: false,
        reasoning: format!("API error: {}", error),
    }
}

/// Parse a model reply, salvaging non-JSON answers heuristically.
///
/// The heuristic only sees the extracted block, not prose around a fence.
pub fn parse_verdict(content: &str) -> SentimentVerdict {
    let block = extract_json_block(content);
    match serde_json::from_str::<SentimentVerdict>(block) {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::debug!(error = %e, "Classifier reply was not JSON, using heuristic verdict");
            heuristic_verdict(block)
        }
    }
}

/// Classify one post. Never fails.
pub async fn classify(ai: &dyn BaseAI, post: &Post) -> SentimentVerdict {
    classify_text(ai, &post.username, &post.text).await
}

/// Classify arbitrary text attributed to `username`.
pub async fn classify_text(ai: &dyn BaseAI, username: &str, text: &str) -> SentimentVerdict {
    let request = CompletionRequest::new(CLASSIFY_SYSTEM_PROMPT, classify_prompt(username, text))
        .temperature(CLASSIFY_TEMPERATURE)
        .max_tokens(CLASSIFY_MAX_TOKENS);

    match ai.complete(request).await {
        Ok(content) => parse_verdict(&content),
        Err(e) => {
            tracing::error!(username, error = %e, "Sentiment classification failed");
            error_verdict(&e)
        }
    }
}
