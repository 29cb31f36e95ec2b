use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::application::ports::{Transcript, TranscriptionEngine, TranscriptionError};

/// Speech-to-text over the OpenAI `/audio/transcriptions` endpoint.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Deserialize)]
struct WhisperSegment {
    avg_logprob: f64,
}

/// Mean per-segment token probability. `None` when no segments came back.
fn segment_confidence(segments: &[WhisperSegment]) -> Option<f32> {
    if segments.is_empty() {
        return None;
    }
    let mean = segments
        .iter()
        .map(|segment| segment.avg_logprob.exp())
        .sum::<f64>()
        / segments.len() as f64;
    Some(mean.clamp(0.0, 1.0) as f32)
}

impl OpenAiWhisperEngine {
    pub fn new(client: reqwest::Client, api_key: String, base_url: &str, model: String) -> Self {
        Self {
            client,
            api_key,
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            model,
        }
    }

    fn form(
        &self,
        audio_data: &[u8],
        filename: &str,
        language: &str,
    ) -> Result<Form, TranscriptionError> {
        let upload = Part::bytes(audio_data.to_vec())
            .file_name(filename.to_string())
            .mime_str(audio_mime(filename)?)
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        Ok(Form::new()
            .text("model", self.model.clone())
            .text("language", language.to_string())
            .text("response_format", "verbose_json")
            .part("file", upload))
    }
}

fn audio_mime(filename: &str) -> Result<&'static str, TranscriptionError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "wav" => Ok("audio/wav"),
        "mp3" => Ok("audio/mpeg"),
        "m4a" => Ok("audio/mp4"),
        "flac" => Ok("audio/flac"),
        "ogg" => Ok("audio/ogg"),
        "aac" => Ok("audio/aac"),
        other => Err(TranscriptionError::UnsupportedFormat(other.to_string())),
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    #[tracing::instrument(skip(self, audio_data), fields(model = %self.model, bytes = audio_data.len()))]
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        language: &str,
    ) -> Result<Transcript, TranscriptionError> {
        let form = self.form(audio_data, filename, language)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let WhisperResponse { text, segments } = response
            .json()
            .await
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("body: {}", e)))?;
        let confidence = segment_confidence(&segments);

        tracing::debug!(
            chars = text.chars().count(),
            segments = segments.len(),
            ?confidence,
            "Whisper transcription received"
        );
        Ok(Transcript {
            text: text.trim().to_string(),
            confidence,
        })
    }
}
