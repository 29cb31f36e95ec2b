use super::{ConversationId, ConversationSummary, Message, PromptMessage};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: ConversationId,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends `message` and drops the oldest entries so that at most
    /// `capacity` remain, preserving order.
    pub fn push_bounded(&mut self, message: Message, capacity: usize) {
        self.messages.push(message);
        if self.messages.len() > capacity {
            let excess = self.messages.len() - capacity;
            self.messages.drain(..excess);
        }
        self.updated_at = Utc::now();
    }

    /// The last `n` messages, oldest first.
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// System entry followed by the last `window` messages as role/content pairs.
    pub fn prompt(&self, system_text: &str, window: usize) -> Vec<PromptMessage> {
        let history = self.tail(window);
        let mut prompt = Vec::with_capacity(history.len() + 1);
        prompt.push(PromptMessage::system(system_text));
        prompt.extend(history.iter().map(PromptMessage::from));
        prompt
    }

    pub fn summary(&self, preview_chars: usize) -> ConversationSummary {
        let last_message_preview = self
            .messages
            .last()
            .map(|m| m.content.chars().take(preview_chars).collect())
            .unwrap_or_default();

        ConversationSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            message_count: self.messages.len(),
            last_message_preview,
        }
    }
}
