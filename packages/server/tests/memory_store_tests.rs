//! Both memory stores behave the same through the trait.

use std::sync::Arc;

use support_core::kernel::{BaseMemoryStore, FileMemoryStore, InMemoryMemoryStore};

async fn exercise(store: Arc<dyn BaseMemoryStore>) {
    assert!(store.is_ready());
    assert_eq!(store.get_user_memory("u1").await.unwrap().count, 0);
    assert!(store.get_conversation_history("u1", 10).await.unwrap().is_empty());

    store.add_message("u1", "user", "hi").await.unwrap();
    store
        .add_message("u1", "user", "Work has been really stressful lately")
        .await
        .unwrap();
    store.add_message("u1", "assistant", "That sounds hard.").await.unwrap();
    store
        .add_memory("u1", "Has a sister named Jo", serde_json::json!({"source": "call"}))
        .await
        .unwrap();

    let memory = store.get_user_memory("u1").await.unwrap();
    assert_eq!(memory.count, 2);
    assert_eq!(memory.memories.len(), 2);
    assert_eq!(memory.memories[1].metadata["source"], "call");

    let hits = store.search_memories("u1", "STRESSFUL", 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(store.search_memories("u2", "stressful", 5).await.unwrap().is_empty());

    let history = store.get_conversation_history("u1", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].messages.len(), 3);
    assert!(!history[0].ended);
}

#[tokio::test]
async fn in_memory_store() {
    exercise(Arc::new(InMemoryMemoryStore::new())).await;
}

#[tokio::test]
async fn file_store() {
    let dir = tempfile::tempdir().unwrap();
    exercise(Arc::new(FileMemoryStore::new(dir.path()).unwrap())).await;

    assert!(dir.path().join("u1_memory.json").exists());
    assert!(dir.path().join("u1_history.json").exists());
}

#[tokio::test]
async fn file_store_reloads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileMemoryStore::new(dir.path()).unwrap();
        store
            .add_message("u1", "user", "I finally booked a counselling appointment")
            .await
            .unwrap();
    }

    let store = FileMemoryStore::new(dir.path()).unwrap();
    let memory = store.get_user_memory("u1").await.unwrap();
    assert_eq!(memory.count, 1);
    assert_eq!(
        store.get_conversation_history("u1", 0).await.unwrap()[0].messages[0].content,
        "I finally booked a counselling appointment"
    );
}

#[tokio::test]
async fn file_store_keeps_unsafe_ids_inside_storage() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileMemoryStore::new(dir.path().join("memories")).unwrap();

    store
        .add_memory("../escape", "note", serde_json::Value::Null)
        .await
        .unwrap();

    assert!(dir.path().join("memories").join("___escape_memory.json").exists());
    assert!(!dir.path().join("escape_memory.json").exists());
}

#[tokio::test]
async fn corrupt_memory_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("u1_memory.json"), "not json").unwrap();

    let store = FileMemoryStore::new(dir.path()).unwrap();
    assert!(store.get_user_memory("u1").await.is_err());
    assert!(store.add_memory("u1", "text", serde_json::Value::Null).await.is_err());
}
