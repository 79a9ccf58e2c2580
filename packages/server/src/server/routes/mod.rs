// HTTP routes
pub mod calls;
pub mod conversations;
pub mod error;
pub mod health;
pub mod support;
pub mod ws;

pub use calls::*;
pub use conversations::*;
pub use error::ApiError;
pub use health::*;
pub use support::*;
pub use ws::*;
