use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{SpeechSynthesizer, TranscriptionEngine};
use crate::presentation::config::{ProviderSetting, VoiceSettings};

use super::mock_voice_engines::{MockSpeechSynthesizer, MockTranscriptionEngine};
use super::openai_speech_synthesizer::OpenAiSpeechSynthesizer;
use super::openai_whisper_engine::OpenAiWhisperEngine;

pub struct VoiceEngines {
    pub transcription: Arc<dyn TranscriptionEngine>,
    pub synthesis: Arc<dyn SpeechSynthesizer>,
}

pub struct VoiceEngineFactory;

impl VoiceEngineFactory {
    pub fn create(
        provider: ProviderSetting,
        settings: &VoiceSettings,
        client: reqwest::Client,
        mock_delay: Duration,
    ) -> VoiceEngines {
        match provider {
            ProviderSetting::OpenAi => {
                tracing::info!(
                    stt_model = %settings.stt_model,
                    tts_model = %settings.tts_model,
                    "Using OpenAI voice engines"
                );
                VoiceEngines {
                    transcription: Arc::new(OpenAiWhisperEngine::new(
                        client.clone(),
                        settings.api_key.clone(),
                        &settings.base_url,
                        settings.stt_model.clone(),
                    )),
                    synthesis: Arc::new(OpenAiSpeechSynthesizer::new(
                        client,
                        settings.api_key.clone(),
                        &settings.base_url,
                        settings.tts_model.clone(),
                        settings.default_voice.clone(),
                    )),
                }
            }
            ProviderSetting::Mock => {
                tracing::warn!("Using mock voice engines");
                VoiceEngines {
                    transcription: Arc::new(MockTranscriptionEngine::new(mock_delay)),
                    synthesis: Arc::new(MockSpeechSynthesizer),
                }
            }
        }
    }
}
