//! Reference message store server.

pub mod routes;
pub mod storage;

pub use routes::router;
pub use storage::{MemoryStore, StorageError};
