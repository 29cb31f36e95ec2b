mod llm_client;
mod speech_synthesizer;
mod transcription_engine;

pub use llm_client::{LlmClient, LlmClientError};
pub use speech_synthesizer::{SpeechSynthesisError, SpeechSynthesizer};
pub use transcription_engine::{Transcript, TranscriptionEngine, TranscriptionError};
