pub mod record;
pub mod verdict;

pub use record::{OutreachRecord, OutreachReport};
pub use verdict::SentimentVerdict;
