use std::time::Duration;

use assistant_gateway::application::ports::{SpeechSynthesizer, TranscriptionEngine};
use assistant_gateway::infrastructure::audio::{
    MOCK_TRANSCRIPT_CONFIDENCE, MockSpeechSynthesizer, MockTranscriptionEngine,
    VoiceEngineFactory,
};
use assistant_gateway::presentation::config::ProviderSetting;

use crate::helpers::test_settings;

#[tokio::test]
async fn given_audio_when_mock_transcribing_then_names_file_and_size() {
    let engine = MockTranscriptionEngine::default();

    let transcript = engine.transcribe(&[0; 42], "memo.ogg", "de").await.unwrap();

    assert_eq!(transcript.text, "Mock transcript of memo.ogg (42 bytes)");
    assert_eq!(transcript.confidence, Some(MOCK_TRANSCRIPT_CONFIDENCE));
}

#[tokio::test]
async fn given_text_when_mock_synthesizing_then_returns_wav_scaled_by_speed() {
    let synthesizer = MockSpeechSynthesizer;

    let normal = synthesizer.synthesize("hello", None, 1.0).await.unwrap();
    let fast = synthesizer.synthesize("hello", None, 2.0).await.unwrap();

    assert_eq!(&normal[..4], b"RIFF");
    assert_eq!(&normal[8..12], b"WAVE");
    // 5 chars * 50 ms * 16 kHz * 2 bytes per sample
    assert_eq!(normal.len(), 44 + 8000);
    assert_eq!(fast.len(), 44 + 4000);
}

#[tokio::test]
async fn given_mock_provider_when_creating_engines_then_both_are_offline() {
    let settings = test_settings();

    let engines = VoiceEngineFactory::create(
        ProviderSetting::Mock,
        &settings.voice,
        reqwest::Client::new(),
        Duration::ZERO,
    );

    assert!(engines.synthesis.health_check().await.is_ok());
    let transcript = engines.transcription.transcribe(&[1], "a.wav", "en").await.unwrap();
    assert!(transcript.text.starts_with("Mock transcript"));
}
