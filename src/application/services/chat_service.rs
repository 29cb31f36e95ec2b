use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{ConversationId, MessageRole};

use super::conversation_store::{ConversationError, ConversationStore};

/// Upper bound on a single user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Instruction text sent as the leading system entry of every chat prompt.
pub fn chat_system_prompt(assistant_name: &str, language: &str) -> String {
    format!(
        "You are a helpful and friendly virtual assistant named {assistant_name}.\n\
         Respond in the language '{language}' clearly and concisely.\n\
         Be professional but approachable in your answers.\n\
         If you do not know something, admit it honestly."
    )
}

pub struct ChatService {
    store: Arc<ConversationStore>,
    llm_client: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl ChatService {
    pub fn new(
        store: Arc<ConversationStore>,
        llm_client: Arc<dyn LlmClient>,
        system_prompt: String,
    ) -> Self {
        Self {
            store,
            llm_client,
            system_prompt,
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Runs one user/assistant exchange.
    ///
    /// Input is validated before anything is stored. A supplied
    /// `conversation_id` must already exist. If the completion call fails the
    /// user message stays in the history without a reply.
    #[tracing::instrument(skip_all, fields(conversation_id = tracing::field::Empty))]
    pub async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<ConversationId>,
    ) -> Result<ChatReply, ChatError> {
        validate_message(message)?;

        let (conversation_id, _) = self.store.get_or_create(conversation_id)?;
        tracing::Span::current().record("conversation_id", conversation_id.as_str());

        let _turn = self.store.lock_turn(&conversation_id).await?;

        self.store
            .append_message(&conversation_id, MessageRole::User, message)?;
        let prompt = self
            .store
            .build_prompt(&conversation_id, &self.system_prompt)?;

        let response = match self.llm_client.chat_completion(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Completion failed, user message kept without reply");
                return Err(ChatError::Completion(e));
            }
        };

        self.store
            .append_message(&conversation_id, MessageRole::Assistant, response.clone())?;

        tracing::info!(prompt_messages = prompt.len(), "Chat turn completed");

        Ok(ChatReply {
            response,
            conversation_id,
            timestamp: Utc::now(),
        })
    }
}

fn validate_message(message: &str) -> Result<(), ChatError> {
    if message.trim().is_empty() {
        return Err(ChatError::InvalidInput(
            "message must not be empty".to_string(),
        ));
    }
    let chars = message.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(ChatError::InvalidInput(format!(
            "message is {} characters, maximum is {}",
            chars, MAX_MESSAGE_CHARS
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: ConversationId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
