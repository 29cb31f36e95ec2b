use super::MessageRole;
use chrono::{DateTime, Utc};

/// A single chat turn. Never mutated after it is appended to a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: String) -> Self {
        Self {
            role,
            content,
            created_at: Utc::now(),
        }
    }
}
