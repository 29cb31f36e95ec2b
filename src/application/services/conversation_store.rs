use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::OwnedMutexGuard;

use crate::domain::{
    Conversation, ConversationId, ConversationSummary, Message, MessageRole, PromptMessage,
};

/// Maximum number of messages retained per conversation.
pub const MAX_STORED_MESSAGES: usize = 20;
/// Maximum number of history messages included in an assembled prompt.
pub const PROMPT_WINDOW: usize = 10;
/// Length, in characters, of the last-message preview in summaries.
pub const PREVIEW_CHARS: usize = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub conversations: usize,
    pub total_messages: usize,
}

type ConversationMap = HashMap<ConversationId, Arc<ConversationEntry>>;

struct ConversationEntry {
    conversation: Mutex<Conversation>,
    turn: Arc<tokio::sync::Mutex<()>>,
}

impl ConversationEntry {
    fn new(id: ConversationId) -> Self {
        Self {
            conversation: Mutex::new(Conversation::new(id)),
            turn: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Conversation> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-local conversation table.
///
/// The map lock is only held for lookups and inserts. Each record carries its
/// own mutex for reads and appends, and a separate async turn lock that
/// callers hold across a full user/assistant exchange.
#[derive(Default)]
pub struct ConversationStore {
    conversations: RwLock<ConversationMap>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `id`, or creates an empty one under a fresh id
    /// when `id` is `None`. A supplied id that is not stored is `NotFound`.
    pub fn get_or_create(
        &self,
        id: Option<ConversationId>,
    ) -> Result<(ConversationId, Conversation), ConversationError> {
        match id {
            Some(id) => {
                let conversation = self.get(&id)?;
                Ok((id, conversation))
            }
            None => {
                let mut map = self.write_map();
                let mut id = ConversationId::new();
                while map.contains_key(&id) {
                    id = ConversationId::new();
                }
                let entry = Arc::new(ConversationEntry::new(id.clone()));
                let conversation = entry.lock().clone();
                map.insert(id.clone(), entry);
                drop(map);

                tracing::debug!(conversation_id = %id, "Created conversation");
                Ok((id, conversation))
            }
        }
    }

    pub fn append_message(
        &self,
        id: &ConversationId,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<(), ConversationError> {
        let entry = self.entry(id)?;
        let mut conversation = entry.lock();
        conversation.push_bounded(Message::new(role, content.into()), MAX_STORED_MESSAGES);

        tracing::trace!(
            conversation_id = %id,
            role = %role,
            messages = conversation.messages.len(),
            "Appended message"
        );
        Ok(())
    }

    /// Read-only projection: one system entry, then up to [`PROMPT_WINDOW`]
    /// stored messages, oldest first.
    pub fn build_prompt(
        &self,
        id: &ConversationId,
        system_text: &str,
    ) -> Result<Vec<PromptMessage>, ConversationError> {
        let entry = self.entry(id)?;
        let conversation = entry.lock();
        Ok(conversation.prompt(system_text, PROMPT_WINDOW))
    }

    pub fn get(&self, id: &ConversationId) -> Result<Conversation, ConversationError> {
        let entry = self.entry(id)?;
        let conversation = entry.lock().clone();
        Ok(conversation)
    }

    /// Removes the record. Returns whether it existed.
    pub fn delete(&self, id: &ConversationId) -> bool {
        let removed = self.write_map().remove(id).is_some();
        if removed {
            tracing::debug!(conversation_id = %id, "Deleted conversation");
        }
        removed
    }

    /// Summaries ordered by creation time.
    pub fn list_all(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .entries()
            .into_iter()
            .map(|entry| entry.lock().summary(PREVIEW_CHARS))
            .collect();
        summaries.sort_by_key(|s| s.created_at);
        summaries
    }

    pub fn stats(&self) -> StoreStats {
        let entries = self.entries();
        StoreStats {
            conversations: entries.len(),
            total_messages: entries.iter().map(|e| e.lock().messages.len()).sum(),
        }
    }

    /// Waits for exclusive use of the conversation for one chat turn.
    ///
    /// The shared map is not locked while waiting, so other conversations
    /// proceed independently.
    pub async fn lock_turn(
        &self,
        id: &ConversationId,
    ) -> Result<OwnedMutexGuard<()>, ConversationError> {
        let turn = Arc::clone(&self.entry(id)?.turn);
        let guard = Arc::clone(&turn).lock_owned().await;

        // Deleted while we were waiting.
        let still_stored = self
            .read_map()
            .get(id)
            .is_some_and(|entry| Arc::ptr_eq(&entry.turn, &turn));
        if !still_stored {
            return Err(ConversationError::NotFound(id.clone()));
        }
        Ok(guard)
    }

    fn entry(&self, id: &ConversationId) -> Result<Arc<ConversationEntry>, ConversationError> {
        self.read_map()
            .get(id)
            .cloned()
            .ok_or_else(|| ConversationError::NotFound(id.clone()))
    }

    fn entries(&self) -> Vec<Arc<ConversationEntry>> {
        self.read_map().values().cloned().collect()
    }

    fn read_map(&self) -> RwLockReadGuard<'_, ConversationMap> {
        self.conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, ConversationMap> {
        self.conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
