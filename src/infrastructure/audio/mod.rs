mod mock_voice_engines;
mod openai_speech_synthesizer;
mod openai_whisper_engine;
mod voice_engine_factory;

pub use mock_voice_engines::{
    MOCK_TRANSCRIPT_CONFIDENCE, MockSpeechSynthesizer, MockTranscriptionEngine,
};
pub use openai_speech_synthesizer::OpenAiSpeechSynthesizer;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use voice_engine_factory::{VoiceEngineFactory, VoiceEngines};
