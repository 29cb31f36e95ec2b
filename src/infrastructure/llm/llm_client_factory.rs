use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::presentation::config::{LlmSettings, ProviderSetting};

use super::mock_llm_client::MockLlmClient;
use super::openai_client::OpenAiClient;

pub struct LlmClientFactory;

impl LlmClientFactory {
    pub fn create(
        provider: ProviderSetting,
        settings: &LlmSettings,
        mock_delay: Duration,
    ) -> Result<Arc<dyn LlmClient>, LlmClientError> {
        match provider {
            ProviderSetting::OpenAi => {
                if settings.api_key.is_empty() {
                    tracing::warn!("LLM api_key is empty; completion calls will be rejected");
                }
                tracing::info!(model = %settings.chat_model, "Using OpenAI-compatible LLM client");
                Ok(Arc::new(OpenAiClient::new(settings)?))
            }
            ProviderSetting::Mock => {
                tracing::warn!("Using mock LLM client");
                Ok(Arc::new(MockLlmClient::new(mock_delay)))
            }
        }
    }
}
