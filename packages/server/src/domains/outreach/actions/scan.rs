//! The outreach scan: search, classify, filter, draft, persist.
//!
//! A single sequential pass. Each external call recovers on its own, so one
//! bad post never stops the scan; only writing the report can fail it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use super::{
    classify, draft_support_message, find_contact_info, search_posts, select_for_outreach,
    write_report,
};
use crate::common::truncate_chars;
use crate::config::MonitorConfig;
use crate::domains::outreach::models::{OutreachRecord, OutreachReport};
use crate::kernel::{BaseAI, BaseSocialPlatform};

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub classify_delay: Duration,
    pub draft_delay: Duration,
    pub dry_run: bool,
    pub output_dir: PathBuf,
}

impl ScanSettings {
    pub fn from_config(config: &MonitorConfig, dry_run: bool) -> Self {
        Self {
            classify_delay: config.classify_delay,
            draft_delay: config.draft_delay,
            dry_run,
            output_dir: config.output_dir.clone(),
        }
    }
}

/// What a finished scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub records: Vec<OutreachRecord>,
    pub report_path: Option<PathBuf>,
    pub total_posts_scanned: usize,
    pub negative_posts_found: usize,
}

pub struct OutreachPipeline {
    platform: Arc<dyn BaseSocialPlatform>,
    ai: Arc<dyn BaseAI>,
    settings: ScanSettings,
}

impl OutreachPipeline {
    pub fn new(
        platform: Arc<dyn BaseSocialPlatform>,
        ai: Arc<dyn BaseAI>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            platform,
            ai,
            settings,
        }
    }

    /// Run one full scan.
    pub async fn scan_and_analyze(&self, query: &str, max_posts: i64) -> Result<ScanOutcome> {
        tracing::info!(query, max_posts, dry_run = self.settings.dry_run, "Starting scan");

        let posts = search_posts(self.platform.as_ref(), query, max_posts).await;
        if posts.is_empty() {
            tracing::info!("No posts found");
            return Ok(ScanOutcome {
                records: Vec::new(),
                report_path: None,
                total_posts_scanned: 0,
                negative_posts_found: 0,
            });
        }

        let total = posts.len();
        tracing::info!(count = total, "Analyzing sentiment");

        let mut classified = Vec::with_capacity(total);
        for (idx, post) in posts.into_iter().enumerate() {
            tracing::info!(
                progress = %format!("{}/{}", idx + 1, total),
                username = %post.username,
                "Analyzing post"
            );

            let verdict = classify(self.ai.as_ref(), &post).await;
            if verdict.needs_outreach() {
                tracing::warn!(
                    post_id = %post.id,
                    severity = %verdict.severity,
                    concerns = %verdict.concerns.join(", "),
                    "Distress indicated"
                );
            }
            classified.push((post, verdict));

            tokio::time::sleep(self.settings.classify_delay).await;
        }

        let flagged = select_for_outreach(classified);
        let negative_posts_found = flagged.len();
        tracing::info!(count = negative_posts_found, "Posts needing support");

        let mut records = Vec::with_capacity(negative_posts_found);
        for (idx, (post, verdict)) in flagged.into_iter().enumerate() {
            tracing::info!(
                progress = %format!("{}/{}", idx + 1, negative_posts_found),
                username = %post.username,
                "Drafting outreach"
            );

            let contact = find_contact_info(self.platform.as_ref(), post.author_id.as_deref()).await;
            let message = draft_support_message(self.ai.as_ref(), &post, &verdict.concerns).await;

            let record = OutreachRecord::new(&post, verdict, contact, message);
            if self.settings.dry_run {
                tracing::info!(
                    username = ?record.username,
                    message = %truncate_chars(&record.support_message, 100),
                    "[DRY RUN] Would send message"
                );
            } else {
                tracing::info!(
                    username = ?record.username,
                    profile_url = ?record.profile_url,
                    "Draft saved for manual review"
                );
            }
            records.push(record);

            tokio::time::sleep(self.settings.draft_delay).await;
        }

        let report = OutreachReport {
            scan_timestamp: Utc::now().to_rfc3339(),
            query: query.to_string(),
            total_posts_scanned: total,
            negative_posts_found,
            results: records,
        };
        let report_path = write_report(&self.settings.output_dir, &report)?;
        if let Some(path) = &report_path {
            tracing::info!(path = %path.display(), "Report saved");
        }

        Ok(ScanOutcome {
            records: report.results,
            report_path,
            total_posts_scanned: total,
            negative_posts_found,
        })
    }
}
