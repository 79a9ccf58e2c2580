//! Outreach actions - one module per pipeline stage.

pub mod classify;
pub mod draft;
pub mod filter;
pub mod report;
pub mod scan;
pub mod search;

pub use classify::{classify, classify_text, parse_verdict};
pub use draft::draft_support_message;
pub use filter::select_for_outreach;
pub use report::{find_latest_report, read_report, write_report};
pub use scan::{OutreachPipeline, ScanOutcome, ScanSettings};
pub use search::{clamp_max_results, default_query, find_contact_info, search_posts, DEFAULT_QUERY};
