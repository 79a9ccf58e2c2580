// Business domains
pub mod conversations;
pub mod outreach;
pub mod tracking;
pub mod trends;
