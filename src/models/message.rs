use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the store. Never reused.
pub type MessageId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub order: u32,
}

impl Message {
    pub fn new(id: MessageId, content: impl Into<String>, order: u32) -> Self {
        Self {
            id,
            content: content.into(),
            order,
        }
    }

    /// The update body that keeps this message's content and moves it to `order`.
    pub fn moved_to(&self, order: u32) -> MessageUpdate {
        MessageUpdate {
            order,
            content: self.content.clone(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} (#{})", self.order + 1, self.content, self.id)
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub content: String,
    pub order: u32,
}

/// Body of an update request. Both fields are always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUpdate {
    pub order: u32,
    pub content: String,
}

/// Sorts messages by `order`, ascending. Ties keep their relative position.
pub fn sort_by_order(messages: &mut [Message]) {
    messages.sort_by_key(|m| m.order);
}

/// True when the orders are exactly `0..n` in sequence, with no gaps or duplicates.
pub fn is_contiguous(messages: &[Message]) -> bool {
    let mut orders: Vec<u32> = messages.iter().map(|m| m.order).collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(i, &o)| o as usize == i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moved_to_keeps_content() {
        let msg = Message::new(7, "hello", 2);
        let update = msg.moved_to(1);

        assert_eq!(update.order, 1);
        assert_eq!(update.content, "hello");
    }

    #[test]
    fn test_display() {
        let msg = Message::new(3, "buy milk", 0);
        assert_eq!(format!("{}", msg), "1. buy milk (#3)");
    }

    #[test]
    fn test_sort_by_order() {
        let mut messages = vec![
            Message::new(1, "c", 2),
            Message::new(2, "a", 0),
            Message::new(3, "b", 1),
        ];
        sort_by_order(&mut messages);

        let ids: Vec<_> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_is_contiguous() {
        assert!(is_contiguous(&[]));
        assert!(is_contiguous(&[
            Message::new(1, "a", 1),
            Message::new(2, "b", 0),
        ]));
        assert!(!is_contiguous(&[
            Message::new(1, "a", 0),
            Message::new(2, "b", 2),
        ]));
        assert!(!is_contiguous(&[
            Message::new(1, "a", 0),
            Message::new(2, "b", 0),
        ]));
    }

    #[test]
    fn test_deserialize_store_payload() {
        let json = r#"{"id": 12, "content": "hi", "order": 4}"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        assert_eq!(msg, Message::new(12, "hi", 4));
    }
}
