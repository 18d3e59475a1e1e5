//! Sync error types.

use reqwest::StatusCode;
use thiserror::Error;

use crate::models::MessageId;

/// Errors that can occur while keeping the local list in step with the store.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Content was empty after trimming. Nothing was sent.
    #[error("Message can not be empty")]
    EmptyContent,

    /// The id is not in the local list. Nothing was sent.
    #[error("Message not found: {0}")]
    NotFound(MessageId),

    /// The request never produced a response (connect, body, decode).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("Store returned status {0}")]
    Status(StatusCode),

    /// The store did not answer within the configured timeout.
    #[error("Store request timed out")]
    Timeout,

    /// A follow-up update failed after an earlier step of the same
    /// operation succeeded. The store and the local list disagree about
    /// `id` until the next load.
    #[error("Store out of sync for message {id}: {source}")]
    PartialSync {
        id: MessageId,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    pub(crate) fn partial(id: MessageId, source: SyncError) -> Self {
        SyncError::PartialSync {
            id,
            source: Box::new(source),
        }
    }

    /// True for the local validation failure that the view shows as a flag.
    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::EmptyContent)
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SyncError::Timeout
        } else if let Some(status) = e.status() {
            SyncError::Status(status)
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}
