//! In-memory message storage for the reference store server.
//!
//! Ids come from a counter starting at 1 and are never reused. Orders are
//! stored exactly as clients send them; keeping them contiguous is the
//! client's job.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{Message, MessageId, MessageUpdate, NewMessage};
use crate::sync::{MessageStore, SyncError};

/// Errors returned by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No message with this id.
    NotFound(MessageId),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(id) => write!(f, "Message not found: {}", id),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Default)]
struct Inner {
    messages: BTreeMap<MessageId, Message>,
    last_id: MessageId,
}

/// Thread-safe message storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages, by id.
    pub async fn list(&self) -> Vec<Message> {
        self.inner.read().await.messages.values().cloned().collect()
    }

    pub async fn get(&self, id: MessageId) -> Option<Message> {
        self.inner.read().await.messages.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn create(&self, new_message: NewMessage) -> Message {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let message = Message::new(inner.last_id, new_message.content, new_message.order);
        inner.messages.insert(message.id, message.clone());
        message
    }

    pub async fn update(
        &self,
        id: MessageId,
        update: MessageUpdate,
    ) -> Result<Message, StorageError> {
        let mut inner = self.inner.write().await;
        let message = inner
            .messages
            .get_mut(&id)
            .ok_or(StorageError::NotFound(id))?;

        message.order = update.order;
        message.content = update.content;
        Ok(message.clone())
    }

    pub async fn delete(&self, id: MessageId) -> Result<Message, StorageError> {
        self.inner
            .write()
            .await
            .messages
            .remove(&id)
            .ok_or(StorageError::NotFound(id))
    }
}

impl From<StorageError> for SyncError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) => SyncError::Status(StatusCode::NOT_FOUND),
        }
    }
}

/// Lets a synchronizer drive the storage directly, without HTTP.
#[async_trait]
impl MessageStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Message>, SyncError> {
        Ok(MemoryStore::list(self).await)
    }

    async fn create(&self, message: &NewMessage) -> Result<Message, SyncError> {
        Ok(MemoryStore::create(self, message.clone()).await)
    }

    async fn delete(&self, id: MessageId) -> Result<Message, SyncError> {
        Ok(MemoryStore::delete(self, id).await?)
    }

    async fn update(&self, id: MessageId, update: &MessageUpdate) -> Result<Message, SyncError> {
        Ok(MemoryStore::update(self, id, update.clone()).await?)
    }
}
