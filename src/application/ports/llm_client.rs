use async_trait::async_trait;

use crate::domain::PromptMessage;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends the ordered prompt to the chat-completion endpoint and returns
    /// the assistant text of the first choice. A blank reply is an
    /// `InvalidResponse`, never `Ok`.
    async fn chat_completion(&self, messages: &[PromptMessage]) -> Result<String, LlmClientError>;

    /// Cheap reachability check used by the system health endpoint.
    async fn health_check(&self) -> Result<(), LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
