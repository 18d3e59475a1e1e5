//! msgsync
//!
//! Keeps an ordered list of messages in agreement with a remote store,
//! plus an in-memory reference store that serves the same HTTP contract.

pub mod config;
pub mod models;
pub mod server;
pub mod sync;

pub use models::{Message, MessageId};
pub use sync::{HttpMessageStore, MessageStore, MessageSynchronizer, SyncError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
