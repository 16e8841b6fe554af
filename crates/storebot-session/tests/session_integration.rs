//! Integration tests for storebot-session: registry behavior across tasks.

use std::sync::Arc;
use storebot_core::Message;
use storebot_session::SessionRegistry;

#[tokio::test]
async fn test_concurrent_get_or_create_single_session() {
    let registry = Arc::new(SessionRegistry::with_capacity(8));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            registry.get_or_create("shared")
        }));
    }

    let mut sessions = Vec::new();
    for h in handles {
        sessions.push(h.await.unwrap());
    }

    // All tasks must observe the same session.
    assert_eq!(registry.len(), 1);
    for s in &sessions[1..] {
        assert!(Arc::ptr_eq(&sessions[0], s));
    }
}

#[tokio::test]
async fn test_session_lock_serializes_appends() {
    let registry = SessionRegistry::with_capacity(2);
    let handle = registry.get_or_create("default");

    {
        let mut session = handle.lock().await;
        let sid = session.id;
        session.add_message(Message::user("first", sid));
    }
    {
        let mut session = handle.lock().await;
        let sid = session.id;
        session.add_message(Message::user("second", sid));
    }

    let session = handle.lock().await;
    assert_eq!(session.message_count(), 2);
    assert_eq!(session.messages[0].text(), Some("first"));
    assert_eq!(session.messages[1].text(), Some("second"));
}

#[tokio::test]
async fn test_evicted_thread_starts_fresh() {
    let registry = SessionRegistry::with_capacity(1);

    let first = registry.get_or_create("t");
    {
        let mut session = first.lock().await;
        let sid = session.id;
        session.add_message(Message::user("remember me", sid));
    }

    // Inserting a second thread evicts "t".
    registry.get_or_create("other");
    let fresh = registry.get_or_create("t");

    let session = fresh.lock().await;
    assert_eq!(session.message_count(), 0);
    assert!(!Arc::ptr_eq(&first, &fresh));
}
