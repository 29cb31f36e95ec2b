use serde::{Deserialize, Serialize};

use super::{Message, MessageRole};

/// Role/content pair in the shape a chat-completion API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

impl From<&Message> for PromptMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role, message.content.clone())
    }
}
