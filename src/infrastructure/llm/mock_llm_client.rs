use std::time::Duration;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{MessageRole, PromptMessage};

/// Offline stand-in that echoes the latest user message.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    delay: Duration,
}

impl MockLlmClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn chat_completion(&self, messages: &[PromptMessage]) -> Result<String, LlmClientError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let question = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(format!(
            "Mock answer to \"{}\" ({} prompt messages)",
            question,
            messages.len()
        ))
    }

    async fn health_check(&self) -> Result<(), LlmClientError> {
        Ok(())
    }
}
