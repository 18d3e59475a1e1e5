//! Keeps the local ordered message list in agreement with the store.
//!
//! The local list is the copy the view renders; the store is authoritative.
//! Every mutation is applied locally either optimistically (delete
//! compaction) or once the store has confirmed it (append, swaps).
//!
//! Operations go through a single queue, one at a time. Neighbour lookup
//! for a swap reads `order` values that are only settled once the previous
//! operation has applied its responses.

use futures::future::join_all;
use tokio::sync::{watch, Mutex};

use super::error::SyncError;
use super::store::MessageStore;
use crate::models::{is_contiguous, sort_by_order, Message, MessageId, NewMessage};

/// What the view layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Messages sorted by `order`, ascending.
    pub messages: Vec<Message>,
    /// Set when the last submitted content was empty.
    pub validation_error: bool,
    /// Message currently being moved, if any.
    pub moving: Option<MessageId>,
}

/// Direction of an adjacent swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Result of a delete whose store call succeeded.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// The message as the store last held it.
    pub deleted: Message,
    /// One `PartialSync` per compaction update the store rejected.
    pub failed: Vec<SyncError>,
}

impl DeleteOutcome {
    /// Ids whose new order never reached the store.
    pub fn failed_ids(&self) -> Vec<MessageId> {
        self.failed
            .iter()
            .filter_map(|e| match e {
                SyncError::PartialSync { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

pub struct MessageSynchronizer<S> {
    store: S,
    view: watch::Sender<ViewState>,
    queue: Mutex<()>,
}

impl<S: MessageStore> MessageSynchronizer<S> {
    /// Creates a synchronizer with an empty list. Call [`load`](Self::load)
    /// to fetch the store's contents.
    pub fn new(store: S) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        Self {
            store,
            view,
            queue: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receives a new `ViewState` after every change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Snapshot of the local list, sorted by order.
    pub fn messages(&self) -> Vec<Message> {
        self.view.borrow().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.view.borrow().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find(&self, id: MessageId) -> Option<Message> {
        self.view
            .borrow()
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Replaces the local list with the store's contents.
    ///
    /// Orders are taken as-is. A store whose orders are not contiguous is
    /// logged but not repaired.
    pub async fn load(&self) -> Result<(), SyncError> {
        let _turn = self.queue.lock().await;

        let mut messages = match self.store.list().await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to load messages: {}", e);
                return Err(e);
            }
        };
        sort_by_order(&mut messages);

        if !is_contiguous(&messages) {
            tracing::warn!(
                "Store holds non-contiguous orders for {} message(s)",
                messages.len()
            );
        }
        tracing::debug!("Loaded {} message(s)", messages.len());

        self.view.send_modify(|view| view.messages = messages);
        Ok(())
    }

    /// Adds a message at the end of the list.
    ///
    /// Whitespace-only content is rejected without touching the store and
    /// raises the view's validation flag. Content is sent as given.
    pub async fn append(&self, content: &str) -> Result<Message, SyncError> {
        if content.trim().is_empty() {
            self.view.send_modify(|view| view.validation_error = true);
            return Err(SyncError::EmptyContent);
        }
        self.view.send_modify(|view| view.validation_error = false);

        let _turn = self.queue.lock().await;

        let new_message = NewMessage {
            content: content.to_string(),
            order: self.len() as u32,
        };

        let created = match self.store.create(&new_message).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!("Failed to submit message: {}", e);
                return Err(e);
            }
        };
        tracing::debug!(id = created.id, order = created.order, "Appended message");

        self.view
            .send_modify(|view| view.messages.push(created.clone()));
        Ok(created)
    }

    /// Deletes a message and closes the gap it leaves.
    ///
    /// Once the store confirms the delete, every message after it moves up
    /// by one locally, and each of them is written back to the store
    /// concurrently. A failed write-back is logged and reported in the
    /// outcome; it is neither rolled back nor retried.
    pub async fn delete(&self, id: MessageId) -> Result<DeleteOutcome, SyncError> {
        let _turn = self.queue.lock().await;

        if self.find(id).is_none() {
            return Err(SyncError::NotFound(id));
        }

        let deleted = match self.store.delete(id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::error!(id, "Failed to delete message: {}", e);
                return Err(e);
            }
        };
        let gap = deleted.order;

        let mut shifted = Vec::new();
        self.view.send_modify(|view| {
            view.messages.retain(|m| m.id != deleted.id);
            sort_by_order(&mut view.messages);
            for message in view.messages.iter_mut().filter(|m| m.order > gap) {
                message.order -= 1;
                shifted.push(message.clone());
            }
        });

        let writes = shifted.iter().map(|message| async move {
            let result = self
                .store
                .update(message.id, &message.moved_to(message.order))
                .await;
            (message.id, result)
        });

        let failed = join_all(writes)
            .await
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(id, "Failed to update message order: {}", e);
                    Some(SyncError::partial(id, e))
                }
            })
            .collect();

        Ok(DeleteOutcome { deleted, failed })
    }

    /// Swaps a message with the one above it. Returns `false` when it is
    /// already first.
    pub async fn move_up(&self, id: MessageId) -> Result<bool, SyncError> {
        self.move_message(id, Direction::Up).await
    }

    /// Swaps a message with the one below it. Returns `false` when it is
    /// already last.
    pub async fn move_down(&self, id: MessageId) -> Result<bool, SyncError> {
        self.move_message(id, Direction::Down).await
    }

    /// Adjacent swap.
    ///
    /// The target's update is sent and confirmed before the neighbour's.
    /// Local state changes only when both succeed, using the orders the
    /// store echoed. If the second update fails the store keeps the target
    /// moved and the neighbour unmoved while the local list stays as it
    /// was; the error names the neighbour.
    pub async fn move_message(
        &self,
        id: MessageId,
        direction: Direction,
    ) -> Result<bool, SyncError> {
        let _turn = self.queue.lock().await;

        let (target, neighbor) = {
            let view = self.view.borrow();
            let messages = &view.messages;

            let target = messages
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .ok_or(SyncError::NotFound(id))?;

            let last = messages.len() as u32 - 1;
            let neighbor_order = match direction {
                Direction::Up if target.order == 0 => return Ok(false),
                Direction::Up => target.order - 1,
                Direction::Down if target.order >= last => return Ok(false),
                Direction::Down => target.order + 1,
            };

            match messages.iter().find(|m| m.order == neighbor_order) {
                Some(neighbor) => (target, neighbor.clone()),
                None => {
                    tracing::warn!(id, neighbor_order, "No neighbour to swap with");
                    return Ok(false);
                }
            }
        };

        self.view.send_modify(|view| view.moving = Some(id));
        let result = self.swap(&target, &neighbor).await;

        self.view.send_modify(|view| {
            view.moving = None;
            if let Ok((moved, displaced)) = &result {
                for message in view.messages.iter_mut() {
                    if message.id == moved.id {
                        message.order = moved.order;
                    } else if message.id == displaced.id {
                        message.order = displaced.order;
                    }
                }
                sort_by_order(&mut view.messages);
            }
        });

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::error!(id, ?direction, "Failed to move message: {}", e);
                Err(e)
            }
        }
    }

    async fn swap(
        &self,
        target: &Message,
        neighbor: &Message,
    ) -> Result<(Message, Message), SyncError> {
        let moved = self
            .store
            .update(target.id, &target.moved_to(neighbor.order))
            .await?;

        let displaced = self
            .store
            .update(neighbor.id, &neighbor.moved_to(target.order))
            .await
            .map_err(|e| SyncError::partial(neighbor.id, e))?;

        Ok((moved, displaced))
    }
}
