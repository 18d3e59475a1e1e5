//! Drives the HTTP client against the reference server on an ephemeral port.

use axum::{routing::get, Router};
use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use msgsync::models::{is_contiguous, Message};
use msgsync::server::{router, MemoryStore};
use msgsync::sync::{HttpMessageStore, MessageSynchronizer, SyncError};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start() -> (MessageSynchronizer<HttpMessageStore>, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let addr = serve(router(storage.clone())).await;

    let client = HttpMessageStore::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    let sync = MessageSynchronizer::new(client);
    sync.load().await.unwrap();
    (sync, storage)
}

async fn stored(storage: &MemoryStore) -> Vec<Message> {
    let mut messages = storage.list().await;
    messages.sort_by_key(|m| m.order);
    messages
}

fn contents(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.content.as_str()).collect()
}

#[tokio::test]
async fn test_append_and_reload() {
    let (sync, storage) = start().await;

    for word in ["first", "second", "third"] {
        sync.append(word).await.unwrap();
    }

    assert_eq!(stored(&storage).await, sync.messages());

    let fresh = MessageSynchronizer::new(sync.store().clone());
    fresh.load().await.unwrap();
    assert_eq!(fresh.messages(), sync.messages());
}

#[tokio::test]
async fn test_delete_compaction_reaches_server() {
    let (sync, storage) = start().await;
    for word in ["a", "b", "c", "d", "e"] {
        sync.append(word).await.unwrap();
    }

    let outcome = sync.delete(2).await.unwrap();

    assert!(outcome.failed.is_empty());
    let server = stored(&storage).await;
    assert_eq!(contents(&server), vec!["a", "c", "d", "e"]);
    assert!(is_contiguous(&server));
    assert_eq!(server, sync.messages());
}

#[tokio::test]
async fn test_swaps_reach_server() {
    let (sync, storage) = start().await;
    for word in ["A", "B", "C"] {
        sync.append(word).await.unwrap();
    }

    assert!(sync.move_up(3).await.unwrap());
    assert_eq!(contents(&sync.messages()), vec!["A", "C", "B"]);

    assert!(sync.move_down(1).await.unwrap());
    assert_eq!(contents(&sync.messages()), vec!["C", "A", "B"]);

    assert!(!sync.move_up(3).await.unwrap());
    assert_eq!(stored(&storage).await, sync.messages());
}

#[tokio::test]
async fn test_server_404_leaves_local_state() {
    let (sync, storage) = start().await;
    sync.append("a").await.unwrap();
    sync.append("b").await.unwrap();

    // Someone else removed it behind our back.
    storage.delete(1).await.unwrap();

    let err = sync.delete(1).await.unwrap_err();

    assert!(matches!(err, SyncError::Status(StatusCode::NOT_FOUND)));
    assert_eq!(contents(&sync.messages()), vec!["a", "b"]);
}

#[tokio::test]
async fn test_empty_append_never_reaches_server() {
    let (sync, storage) = start().await;

    assert!(sync.append("   ").await.unwrap_err().is_validation());
    assert!(storage.is_empty().await);
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let app = Router::new().route(
        "/messages",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "[]"
        }),
    );
    let addr = serve(app).await;

    let client =
        HttpMessageStore::new(&format!("http://{}", addr), Duration::from_millis(100)).unwrap();
    let sync = MessageSynchronizer::new(client);

    assert!(matches!(sync.load().await, Err(SyncError::Timeout)));
    assert!(sync.is_empty());
}
