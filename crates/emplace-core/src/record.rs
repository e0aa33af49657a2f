//! Record types stored in a module's JSON payload field.
//!
//! Both flavors serialize camelCase with ISO-8601 timestamps so their
//! stored payloads are interchangeable with what the shipped modules
//! already wrote.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// MARK: - Todo

/// One To Do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Opaque id, generated at creation from a millisecond timestamp.
    pub id: String,

    pub text: String,

    pub completed: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Create an open entry with fresh timestamps.
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis().to_string(),
            text: text.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip completion and touch the update timestamp.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        self.updated_at = Utc::now();
    }

    /// Replace the text and touch the update timestamp.
    pub fn rename(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.updated_at = Utc::now();
    }
}

// MARK: - ChatMessage

/// One Talk message. Append-only: messages are never edited or
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Opaque id: millisecond timestamp plus a random suffix.
    pub id: String,

    pub author: String,

    pub message: String,

    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, message: impl Into<String>) -> Self {
        let now = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("msg_{}_{}", now.timestamp_millis(), &suffix[..9]),
            author: author.into(),
            message: message.into(),
            timestamp: now,
        }
    }
}

// MARK: - DataRecord

/// In-memory view of one remote data record: the item's identifier
/// plus the deserialized payload list. The remote field is the
/// durable copy; this view owns the list until a save completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord<T> {
    /// Identifier of the remote item holding the payload.
    pub item_id: String,

    /// Item name, known only when this view created the item.
    pub name: Option<String>,

    /// Deserialized payload list.
    pub entries: Vec<T>,
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_camel_case() {
        let todo = Todo::new("buy milk");
        let json = serde_json::to_string(&todo).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"completed\":false"));
    }

    #[test]
    fn todo_round_trip() {
        let todo = Todo::new("buy milk");
        let json = serde_json::to_string(&vec![todo.clone()]).unwrap();
        let back: Vec<Todo> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![todo]);
    }

    #[test]
    fn toggle_touches_updated_at_only() {
        let mut todo = Todo::new("buy milk");
        let created = todo.created_at;
        todo.toggle();
        assert!(todo.completed);
        assert_eq!(todo.created_at, created);
        assert!(todo.updated_at >= created);
    }

    #[test]
    fn message_id_carries_prefix_and_suffix() {
        let msg = ChatMessage::new("ada", "hello");
        assert!(msg.id.starts_with("msg_"));
        assert_eq!(msg.id.split('_').count(), 3);
    }

    #[test]
    fn message_round_trip() {
        let msg = ChatMessage::new("ada", "hello there");
        let json = serde_json::to_string(&vec![msg.clone()]).unwrap();
        let back: Vec<ChatMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![msg]);
    }

    #[test]
    fn distinct_messages_get_distinct_ids() {
        let a = ChatMessage::new("ada", "one");
        let b = ChatMessage::new("ada", "two");
        assert_ne!(a.id, b.id);
    }
}
