//! Application setup and server configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::conversations::{ActiveConversations, ConversationGraph};
use crate::kernel::ServerDeps;
use crate::server::routes::{
    add_message_handler, conversation_ws_handler, generate_response_handler, health_handler,
    initiate_call_handler, root_handler, user_conversations_handler,
    users_needing_support_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub graph: Arc<ConversationGraph>,
    pub conversations: Arc<ActiveConversations>,
    pub reports_dir: PathBuf,
}

impl AppState {
    pub fn new(deps: ServerDeps, reports_dir: PathBuf) -> Self {
        Self {
            graph: Arc::new(ConversationGraph::new(deps.clone())),
            deps,
            conversations: Arc::new(ActiveConversations::new()),
            reports_dir,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/users/needing-support",
            get(users_needing_support_handler),
        )
        .route("/api/calls/initiate", post(initiate_call_handler))
        // One parameter name per segment; `:id` is a user id on the first
        // route and a conversation id on the others.
        .route("/api/conversations/:id", get(user_conversations_handler))
        .route("/api/conversations/:id/message", post(add_message_handler))
        .route(
            "/api/conversations/:id/generate-response",
            post(generate_response_handler),
        )
        .route("/ws/conversation/:id", get(conversation_ws_handler))
        .layer(Extension(state))
        // The backend is called from the telephony bridge and local tools
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
