mod message;

pub use message::{is_contiguous, sort_by_order, Message, MessageId, MessageUpdate, NewMessage};
