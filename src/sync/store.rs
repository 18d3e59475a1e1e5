//! The contract a remote message store has to honour.

use async_trait::async_trait;

use super::error::SyncError;
use crate::models::{Message, MessageId, MessageUpdate, NewMessage};

/// Authoritative storage for messages, keyed by id.
///
/// Every method maps to one request against the store. Implementations
/// report any non-success outcome as an error and never retry.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Returns every stored message, in no particular order.
    async fn list(&self) -> Result<Vec<Message>, SyncError>;

    /// Stores a new message. The returned message carries the assigned id.
    async fn create(&self, message: &NewMessage) -> Result<Message, SyncError>;

    /// Removes a message and returns it as it was last stored.
    async fn delete(&self, id: MessageId) -> Result<Message, SyncError>;

    /// Overwrites `order` and `content` of a message and echoes the result.
    async fn update(&self, id: MessageId, update: &MessageUpdate) -> Result<Message, SyncError>;
}
