use async_trait::async_trait;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Renders `text` to encoded audio bytes.
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        speed: f32,
    ) -> Result<Vec<u8>, SpeechSynthesisError>;

    async fn health_check(&self) -> Result<(), SpeechSynthesisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechSynthesisError {
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
