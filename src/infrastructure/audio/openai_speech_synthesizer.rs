use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::{SpeechSynthesisError, SpeechSynthesizer};

/// Text-to-speech over the OpenAI `/audio/speech` endpoint. Returns WAV bytes.
pub struct OpenAiSpeechSynthesizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    default_voice: String,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
    response_format: &'static str,
}

impl OpenAiSpeechSynthesizer {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: &str,
        model: String,
        default_voice: String,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            default_voice,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice: Option<&str>,
        speed: f32,
    ) -> Result<Vec<u8>, SpeechSynthesisError> {
        let voice = voice.unwrap_or(self.default_voice.as_str());
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice,
            speed,
            response_format: "wav",
        };

        tracing::debug!(model = %self.model, voice, speed, "Requesting speech synthesis");

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechSynthesisError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechSynthesisError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechSynthesisError::SynthesisFailed(format!("body: {}", e)))?;

        Ok(audio.to_vec())
    }

    async fn health_check(&self) -> Result<(), SpeechSynthesisError> {
        let response = self
            .client
            .get(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| SpeechSynthesisError::ApiRequestFailed(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SpeechSynthesisError::ApiRequestFailed(format!(
                "status {}",
                response.status()
            )))
        }
    }
}
