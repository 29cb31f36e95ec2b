use std::path::Path;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};

use crate::application::ports::{
    LlmClient, LlmClientError, SpeechSynthesisError, SpeechSynthesizer, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::PromptMessage;

pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;
pub const MAX_SPEECH_CHARS: usize = 5000;
pub const MIN_SPEECH_SPEED: f32 = 0.5;
pub const MAX_SPEECH_SPEED: f32 = 2.0;
const DEFAULT_SPEECH_SPEED: f32 = 1.0;
const SECONDS_PER_CHAR: f32 = 0.05;
const AUDIO_EXTENSIONS: [&str; 6] = ["wav", "mp3", "m4a", "flac", "ogg", "aac"];

pub fn is_audio_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Rough playback length of synthesized speech.
pub fn estimate_speech_duration(text: &str) -> f32 {
    text.chars().count() as f32 * SECONDS_PER_CHAR
}

pub struct VoiceService {
    transcription_engine: Arc<dyn TranscriptionEngine>,
    speech_synthesizer: Arc<dyn SpeechSynthesizer>,
    llm_client: Arc<dyn LlmClient>,
    language: String,
    system_prompt: String,
}

impl VoiceService {
    pub fn new(
        transcription_engine: Arc<dyn TranscriptionEngine>,
        speech_synthesizer: Arc<dyn SpeechSynthesizer>,
        llm_client: Arc<dyn LlmClient>,
        language: String,
        system_prompt: String,
    ) -> Self {
        Self {
            transcription_engine,
            speech_synthesizer,
            llm_client,
            language,
            system_prompt,
        }
    }

    #[tracing::instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn transcribe(
        &self,
        filename: &str,
        audio: &[u8],
    ) -> Result<Transcription, VoiceError> {
        if !is_audio_file(filename) {
            return Err(VoiceError::InvalidInput(format!(
                "{} is not an audio file (expected one of: {})",
                filename,
                AUDIO_EXTENSIONS.join(", ")
            )));
        }
        if audio.is_empty() {
            return Err(VoiceError::InvalidInput("audio file is empty".to_string()));
        }
        if audio.len() > MAX_AUDIO_BYTES {
            return Err(VoiceError::InvalidInput(format!(
                "audio file is {} bytes, maximum is {}",
                audio.len(),
                MAX_AUDIO_BYTES
            )));
        }

        let transcript = self
            .transcription_engine
            .transcribe(audio, filename, &self.language)
            .await?;

        tracing::info!(
            chars = transcript.text.chars().count(),
            confidence = ?transcript.confidence,
            "Audio transcribed"
        );

        Ok(Transcription {
            text: transcript.text,
            language: self.language.clone(),
            confidence: transcript.confidence,
        })
    }

    #[tracing::instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn speak(
        &self,
        text: &str,
        voice: Option<&str>,
        speed: Option<f32>,
    ) -> Result<SpeechAudio, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::InvalidInput("text must not be empty".to_string()));
        }
        let chars = text.chars().count();
        if chars > MAX_SPEECH_CHARS {
            return Err(VoiceError::InvalidInput(format!(
                "text is {} characters, maximum is {}",
                chars, MAX_SPEECH_CHARS
            )));
        }
        let speed = speed.unwrap_or(DEFAULT_SPEECH_SPEED);
        if !(MIN_SPEECH_SPEED..=MAX_SPEECH_SPEED).contains(&speed) {
            return Err(VoiceError::InvalidInput(format!(
                "speed must be between {} and {}",
                MIN_SPEECH_SPEED, MAX_SPEECH_SPEED
            )));
        }

        let audio = self.speech_synthesizer.synthesize(text, voice, speed).await?;
        let duration_seconds = estimate_speech_duration(text);

        tracing::info!(
            audio_bytes = audio.len(),
            duration_seconds,
            "Speech synthesized"
        );

        Ok(SpeechAudio {
            audio_base64: general_purpose::STANDARD.encode(&audio),
            duration_seconds,
        })
    }

    /// Transcribes a spoken question, answers it in a single stateless turn
    /// and speaks the answer back.
    pub async fn transcribe_and_respond(
        &self,
        filename: &str,
        audio: &[u8],
    ) -> Result<VoiceReply, VoiceError> {
        let transcription = self.transcribe(filename, audio).await?;

        let prompt = [
            PromptMessage::system(self.system_prompt.as_str()),
            PromptMessage::user(transcription.text.as_str()),
        ];
        let response_text = self
            .llm_client
            .chat_completion(&prompt)
            .await
            .map_err(VoiceError::Completion)?;

        let spoken: String = response_text.chars().take(MAX_SPEECH_CHARS).collect();
        let speech = self.speak(&spoken, None, None).await?;

        Ok(VoiceReply {
            transcription: transcription.text,
            response_text,
            audio_base64: speech.audio_base64,
            duration_seconds: speech.duration_seconds,
        })
    }

    pub async fn health_check(&self) -> Result<(), VoiceError> {
        self.speech_synthesizer.health_check().await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    pub language: String,
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub audio_base64: String,
    pub duration_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct VoiceReply {
    pub transcription: String,
    pub response_text: String,
    pub audio_base64: String,
    pub duration_seconds: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("speech synthesis: {0}")]
    Synthesis(#[from] SpeechSynthesisError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
