// Wellbeing Monitor - Core
//
// Finds public posts that read as distress, drafts supportive outreach for
// human review, tracks replies to offers and serves the voice support backend.
//
// Each area is a domain under domains/; external services sit behind the
// traits in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
