//! Conversation graph and call actions against mocked dependencies.

use std::sync::Arc;

use support_core::domains::conversations::actions::{exchange, start_call, user_conversations};
use support_core::domains::conversations::graph::FALLBACK_RESPONSE;
use support_core::domains::conversations::{ActiveConversations, ConversationError, ConversationGraph};
use support_core::kernel::test_dependencies::{MockAI, TestDependencies};
use support_core::kernel::{CallRequest, FileMemoryStore};

fn call_request(user_id: &str) -> CallRequest {
    CallRequest {
        user_id: user_id.to_string(),
        username: "sam".to_string(),
        phone_number: "+15550100".to_string(),
        context: Some(serde_json::json!({
            "original_post": "I feel overwhelmed and can't sleep",
            "sentiment_analysis": {"concerns": ["stress", "insomnia"]}
        })),
    }
}

#[tokio::test]
async fn start_call_registers_conversation_with_context() {
    let deps = TestDependencies::with_ai(MockAI::new().with_default("Hello there."));
    let graph = ConversationGraph::new(deps.into_server_deps());
    let active = ActiveConversations::new();

    let call = start_call(&graph, &active, call_request("42")).await.unwrap();
    assert_eq!(call.status, "ready");
    assert_eq!(call.initial_message, "Hello there.");

    let conversation = active.get(&call.conversation_id).await.unwrap();
    assert_eq!(conversation.user_id, "42");
    assert!(!conversation.rag_context.is_empty());
    assert!(conversation.rag_context.len() <= 3);
    assert!(conversation.messages.is_empty());

    let calls = deps.ai.calls();
    let greeting_prompt = &calls[0].user;
    assert!(greeting_prompt.contains("You are calling @sam"));
    assert!(greeting_prompt.contains("stress, insomnia"));
}

#[tokio::test]
async fn each_call_gets_a_distinct_id() {
    let deps = TestDependencies::with_ai(MockAI::new().with_default("Hi."));
    let graph = ConversationGraph::new(deps.into_server_deps());
    let active = ActiveConversations::new();

    let first = start_call(&graph, &active, call_request("42")).await.unwrap();
    let second = start_call(&graph, &active, call_request("42")).await.unwrap();
    assert_ne!(first.conversation_id, second.conversation_id);
    assert_eq!(active.len().await, 2);
}

#[tokio::test]
async fn exchange_appends_both_turns_and_feeds_them_back() {
    let deps = TestDependencies::with_ai(
        MockAI::new()
            .when_prompt_contains("You are calling", "Hi, I'm an automated support line.")
            .when_prompt_contains("The person just said: second", "Still here with you.")
            .with_default("I hear you."),
    );
    let graph = ConversationGraph::new(deps.into_server_deps());
    let active = ActiveConversations::new();
    let call = start_call(&graph, &active, call_request("42")).await.unwrap();

    let turn = exchange(&graph, &active, &call.conversation_id, "first")
        .await
        .unwrap();
    assert_eq!(turn.role, "assistant");
    assert_eq!(turn.content, "I hear you.");

    let turn = exchange(&graph, &active, &call.conversation_id, "second")
        .await
        .unwrap();
    assert_eq!(turn.content, "Still here with you.");

    let conversation = active.get(&call.conversation_id).await.unwrap();
    let roles: Vec<_> = conversation.messages.iter().map(|t| t.role.as_str()).collect();
    assert_eq!(roles, ["user", "assistant", "user", "assistant"]);

    let calls = deps.ai.calls();
    let last_prompt = &calls.last().unwrap().user;
    assert!(last_prompt.contains("Recent conversation:"));
    assert!(last_prompt.contains("user: first"));
    assert!(last_prompt.contains("assistant: I hear you."));
}

#[tokio::test]
async fn exchange_on_unknown_conversation_is_not_found() {
    let graph = ConversationGraph::new(TestDependencies::new().into_server_deps());
    let active = ActiveConversations::new();

    let err = exchange(&graph, &active, "conv_missing", "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, ConversationError::NotFound));
}

#[tokio::test]
async fn long_messages_are_remembered_and_recalled() {
    let deps = TestDependencies::with_ai(MockAI::new().with_default("Thanks for sharing."));
    let graph = ConversationGraph::new(deps.into_server_deps());
    let active = ActiveConversations::new();
    let call = start_call(&graph, &active, call_request("42")).await.unwrap();
    let conversation = active.get(&call.conversation_id).await.unwrap();

    let reply = graph
        .generate_response(&conversation, "My exams start next week and I am scared")
        .await;
    assert_eq!(reply.updated_memory.count, 1);
    assert_eq!(
        reply.updated_memory.memories[0].text,
        "User said: My exams start next week and I am scared"
    );

    let short = graph.generate_response(&conversation, "ok").await;
    assert_eq!(short.updated_memory.count, 1);

    // A later message mentioning exams pulls the memory into the prompt
    graph.generate_response(&conversation, "exams").await;
    let calls = deps.ai.calls();
    let prompt = &calls.last().unwrap().user;
    assert!(prompt.contains("Relevant past conversations:"));
    assert!(prompt.contains("My exams start next week"));
}

#[tokio::test]
async fn unreachable_llm_falls_back_to_fixed_reply() {
    let deps = TestDependencies::with_ai(MockAI::failing());
    let graph = ConversationGraph::new(deps.into_server_deps());
    let active = ActiveConversations::new();

    let call = start_call(&graph, &active, call_request("42")).await.unwrap();
    assert!(call.initial_message.starts_with("Hi sam,"));

    let turn = exchange(&graph, &active, &call.conversation_id, "hello")
        .await
        .unwrap();
    assert_eq!(turn.content, FALLBACK_RESPONSE);
}

#[tokio::test]
async fn file_store_history_survives_a_new_graph() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileMemoryStore::new(dir.path()).unwrap());

    let deps = TestDependencies::with_ai(MockAI::new().with_default("Hi.")).with_memory(store.clone());
    let graph = ConversationGraph::new(deps.into_server_deps());
    graph
        .deps()
        .memory
        .add_message("42", "user", "I have been feeling low all week")
        .await
        .unwrap();
    graph.deps().memory.add_message("42", "assistant", "I'm sorry.").await.unwrap();

    let reopened = Arc::new(FileMemoryStore::new(dir.path()).unwrap());
    let graph = ConversationGraph::new(
        TestDependencies::new().with_memory(reopened).into_server_deps(),
    );
    let history = user_conversations(&graph, "42").await.unwrap();
    assert_eq!(history.total_messages, 2);
    assert_eq!(history.conversations.len(), 1);
    assert_eq!(history.memory.count, 1);
}
