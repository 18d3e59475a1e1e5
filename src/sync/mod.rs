//! Ordered message synchronization against a remote store.
//!
//! # Usage
//!
//! ```no_run
//! use msgsync::sync::{HttpMessageStore, MessageSynchronizer};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), msgsync::sync::SyncError> {
//! let store = HttpMessageStore::new("http://localhost:8000", Duration::from_secs(10))?;
//! let sync = MessageSynchronizer::new(store);
//!
//! sync.load().await?;
//! let created = sync.append("hello").await?;
//! sync.move_up(created.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod store;
pub mod synchronizer;

pub use client::HttpMessageStore;
pub use error::SyncError;
pub use store::MessageStore;
pub use synchronizer::{DeleteOutcome, Direction, MessageSynchronizer, ViewState};
