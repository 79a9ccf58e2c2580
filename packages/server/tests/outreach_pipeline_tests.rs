//! End-to-end tests of the outreach scan against mocked services.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use support_core::common::ContactInfo;
use support_core::domains::outreach::{OutreachPipeline, OutreachReport, ScanSettings};
use support_core::kernel::test_dependencies::{MockAI, MockSocialPlatform};

fn settings(dir: &std::path::Path) -> ScanSettings {
    ScanSettings {
        classify_delay: Duration::ZERO,
        draft_delay: Duration::ZERO,
        dry_run: false,
        output_dir: dir.to_path_buf(),
    }
}

fn contact(username: &str) -> ContactInfo {
    ContactInfo {
        username: Some(username.to_string()),
        name: Some("Alice".to_string()),
        description: Some("night shift nurse".to_string()),
        location: None,
        url: None,
        profile_url: Some(ContactInfo::profile_url_for(username)),
    }
}

#[tokio::test]
async fn flags_distressed_post_and_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Arc::new(
        MockSocialPlatform::new()
            .with_posts(vec![
                post("100", "1", "alice", "I feel so alone and exhausted lately"),
                post("101", "2", "bob", "Lovely weather for a walk"),
            ])
            .with_contact("1", contact("alice")),
    );
    let ai = Arc::new(
        MockAI::new()
            .when_prompt_contains("Post by @alice:", DISTRESSED_VERDICT)
            .when_prompt_contains("Post by @bob:", NEUTRAL_VERDICT)
            .when_prompt_contains("direct message to @alice", "\"Hi from an automated wellbeing account. Thinking of you.\""),
    );

    let pipeline = OutreachPipeline::new(platform.clone(), ai.clone(), settings(dir.path()));
    let outcome = pipeline.scan_and_analyze("", 50).await.unwrap();

    assert_eq!(outcome.total_posts_scanned, 2);
    assert_eq!(outcome.negative_posts_found, 1);
    assert_eq!(outcome.records.len(), 1);

    let record = &outcome.records[0];
    assert_eq!(record.username.as_deref(), Some("alice"));
    assert_eq!(record.user_id.as_deref(), Some("1"));
    assert_eq!(
        record.post_url.as_deref(),
        Some("https://twitter.com/alice/status/100")
    );
    assert_eq!(
        record.support_message,
        "Hi from an automated wellbeing account. Thinking of you."
    );
    assert_eq!(record.sentiment_analysis.concerns, vec!["isolation", "exhaustion"]);

    // Default filter and clamped cap reach the platform
    assert_eq!(
        platform.searches(),
        vec![("lang:en -is:retweet".to_string(), 50)]
    );
    // Only the flagged author is looked up
    assert_eq!(platform.lookups(), vec!["1".to_string()]);
    // Two classifications plus one draft
    assert_eq!(ai.call_count(), 3);

    let path = outcome.report_path.expect("report written");
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("support_outreach_") && name.ends_with(".json"));

    let report: OutreachReport =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(report.total_posts_scanned, 2);
    assert_eq!(report.negative_posts_found, 1);
    assert_eq!(report.results, outcome.records);
}

#[tokio::test]
async fn no_posts_means_no_llm_calls_and_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let ai = Arc::new(MockAI::new().with_default(DISTRESSED_VERDICT));
    let pipeline = OutreachPipeline::new(
        Arc::new(MockSocialPlatform::new()),
        ai.clone(),
        settings(dir.path()),
    );

    let outcome = pipeline.scan_and_analyze("feeling sad", 5).await.unwrap();

    assert!(outcome.records.is_empty());
    assert!(outcome.report_path.is_none());
    assert_eq!(ai.call_count(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn search_failure_is_an_empty_scan() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Arc::new(
        MockSocialPlatform::new()
            .with_posts(vec![post("1", "1", "alice", "help")])
            .failing_search(),
    );
    let pipeline = OutreachPipeline::new(platform, Arc::new(MockAI::new()), settings(dir.path()));

    let outcome = pipeline.scan_and_analyze("", 10).await.unwrap();
    assert_eq!(outcome.total_posts_scanned, 0);
    assert!(outcome.report_path.is_none());
}

#[tokio::test]
async fn unreachable_llm_never_produces_outreach() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Arc::new(MockSocialPlatform::new().with_posts(vec![
        post("1", "1", "alice", "I can't go on like this"),
        post("2", "2", "bob", "everything hurts"),
    ]));
    let pipeline = OutreachPipeline::new(
        platform.clone(),
        Arc::new(MockAI::failing()),
        settings(dir.path()),
    );

    let outcome = pipeline.scan_and_analyze("", 10).await.unwrap();

    assert_eq!(outcome.total_posts_scanned, 2);
    assert_eq!(outcome.negative_posts_found, 0);
    assert!(outcome.report_path.is_none());
    assert!(platform.lookups().is_empty());
}

#[tokio::test]
async fn failed_profile_lookup_and_draft_still_queue_a_record() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Arc::new(
        MockSocialPlatform::new().with_posts(vec![post("7", "9", "carol", "nobody would notice")]),
    );
    let ai = Arc::new(
        MockAI::new()
            .when_prompt_contains("Post by @carol:", DISTRESSED_VERDICT)
            .fail_when_prompt_contains("direct message to @carol", "timeout"),
    );
    let pipeline = OutreachPipeline::new(platform, ai, settings(dir.path()));

    let outcome = pipeline.scan_and_analyze("", 10).await.unwrap();
    let record = &outcome.records[0];

    assert!(record.contact_info.is_empty());
    assert!(record.profile_url.is_none());
    assert_eq!(record.username.as_deref(), Some("carol"));
    assert!(record.support_message.starts_with("Hi @carol,"));
    assert!(outcome.report_path.is_some());
}

#[tokio::test]
async fn prose_classification_is_salvaged_heuristically() {
    let dir = tempfile::tempdir().unwrap();
    let platform = Arc::new(
        MockSocialPlatform::new().with_posts(vec![post("3", "4", "dan", "so tired of everything")]),
    );
    let ai = Arc::new(
        MockAI::new()
            .when_prompt_contains("Post by @dan:", "This post reads as negative and the author may need support.")
            .when_prompt_contains("direct message to @dan", "Checking in from an automated account."),
    );
    let pipeline = OutreachPipeline::new(platform, ai, settings(dir.path()));

    let outcome = pipeline.scan_and_analyze("", 10).await.unwrap();

    assert_eq!(outcome.negative_posts_found, 1);
    let verdict = &outcome.records[0].sentiment_analysis;
    assert_eq!(verdict.sentiment, "negative");
    assert_eq!(verdict.severity, "medium");
    assert!(verdict.concerns.is_empty());
}
