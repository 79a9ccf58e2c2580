//! Response tracking domain - offers, replies and call handoffs.

pub mod models;
pub mod tracker;

pub use models::{
    CallRecord, OfferRecord, OfferStatus, ResponseAssessment, TrackingData, UserReply,
};
pub use tracker::{keyword_consent, ResponseTracker};
