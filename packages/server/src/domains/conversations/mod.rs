//! Conversations domain - live support calls, their memory and replies.

pub mod actions;
pub mod active;
pub mod graph;
pub mod models;

pub use actions::ConversationError;
pub use active::ActiveConversations;
pub use graph::ConversationGraph;
pub use models::{Conversation, GeneratedReply, IncomingMessage};
