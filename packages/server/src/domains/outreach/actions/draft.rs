//! Drafting of the supportive message kept in the review queue.

use crate::common::Post;
use crate::kernel::{BaseAI, CompletionRequest};

const DRAFT_SYSTEM_PROMPT: &str = "You write short, warm check-in messages on behalf of an \
automated wellbeing account. You are honest that the account is automated.";

const DRAFT_TEMPERATURE: f32 = 0.7;
const DRAFT_MAX_TOKENS: u32 = 200;

/// Used when the model answers with nothing usable.
pub const FALLBACK_MESSAGE: &str = "Hi, this is an automated wellbeing account. I saw your post \
and wanted to check in. If you'd like someone to talk to, support is available and you're not \
alone. 💙";

/// Used when the model could not be reached.
pub fn addressed_fallback(username: &str) -> String {
    format!(
        "Hi @{}, this is an automated wellbeing account. I saw your post and wanted to check in. \
If you need someone to talk to, support is available. You're not alone. 💙",
        username
    )
}

fn describe_concerns(concerns: &[String]) -> String {
    if concerns.is_empty() {
        "general distress".to_string()
    } else {
        concerns.join(", ")
    }
}

fn draft_prompt(username: &str, text: &str, concerns: &[String]) -> String {
    format!(
        r#"Write a short, kind direct message to @{username}.
They posted: "{text}"

The post suggests concerns about: {concerns}

The message must:
- Say plainly that it comes from an automated wellbeing account
- Be genuine, empathetic and non-intrusive
- Offer support without lecturing or diagnosing
- Respect their privacy and let them ignore it freely
- Fit in a direct message (about 280 characters)

Write only the message text."#,
        concerns = describe_concerns(concerns)
    )
}

/// Strip quotes and surrounding whitespace, then one leading `@`.
pub fn clean_message(raw: &str) -> String {
    let cleaned = raw.trim().replace('"', "");
    let cleaned = cleaned.trim();
    cleaned.strip_prefix('@').unwrap_or(cleaned).to_string()
}

/// Draft a message for the author of `post`. Never fails.
pub async fn draft_support_message(ai: &dyn BaseAI, post: &Post, concerns: &[String]) -> String {
    let request = CompletionRequest::new(
        DRAFT_SYSTEM_PROMPT,
        draft_prompt(&post.username, &post.text, concerns),
    )
    .temperature(DRAFT_TEMPERATURE)
    .max_tokens(DRAFT_MAX_TOKENS);

    match ai.complete(request).await {
        Ok(raw) => {
            let message = clean_message(&raw);
            if message.is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                message
            }
        }
        Err(e) => {
            tracing::error!(username = %post.username, error = %e, "Drafting support message failed");
            addressed_fallback(&post.username)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PostMetrics;
    use crate::kernel::test_dependencies::MockAI;

    fn post() -> Post {
        Post {
            id: "1".into(),
            text: "nothing is going right".into(),
            author_id: Some("7".into()),
            username: "sam".into(),
            name: "Sam".into(),
            created_at: None,
            metrics: PostMetrics::default(),
        }
    }

    #[test]
    fn cleanup_strips_quotes_and_one_at() {
        assert_eq!(clean_message("  \"@sam hello there\"  "), "sam hello there");
        assert_eq!(clean_message("@@x"), "@x");
        assert_eq!(clean_message("\"\""), "");
    }

    #[test]
    fn empty_concerns_read_as_general_distress() {
        assert_eq!(describe_concerns(&[]), "general distress");
        assert_eq!(
            describe_concerns(&["grief".to_string(), "isolation".to_string()]),
            "grief, isolation"
        );
    }

    #[tokio::test]
    async fn empty_reply_uses_fixed_fallback() {
        let ai = MockAI::new().with_default("  \"\"  ");
        let message = draft_support_message(&ai, &post(), &[]).await;
        assert_eq!(message, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn transport_failure_uses_addressed_fallback() {
        let ai = MockAI::failing();
        let message = draft_support_message(&ai, &post(), &[]).await;
        assert!(message.starts_with("Hi @sam,"));
        assert!(message.contains("automated"));
    }

    #[tokio::test]
    async fn prompt_requires_disclosure() {
        let ai = MockAI::new().with_default("Thinking of you.");
        let message = draft_support_message(&ai, &post(), &["burnout".to_string()]).await;
        assert_eq!(message, "Thinking of you.");

        let call = &ai.calls()[0];
        assert_eq!(call.max_tokens, 200);
        assert!(call.user.contains("automated wellbeing account"));
        assert!(call.user.contains("concerns about: burnout"));
    }
}
