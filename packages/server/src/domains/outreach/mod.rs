//! Outreach domain - finds distressed posts and queues drafted check-ins
//! for human review. Nothing here sends messages.

pub mod actions;
pub mod models;

pub use actions::{OutreachPipeline, ScanOutcome, ScanSettings};
pub use models::{OutreachRecord, OutreachReport, SentimentVerdict};
