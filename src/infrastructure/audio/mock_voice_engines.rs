use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{
    SpeechSynthesisError, SpeechSynthesizer, Transcript, TranscriptionEngine, TranscriptionError,
};

pub const MOCK_TRANSCRIPT_CONFIDENCE: f32 = 0.95;

/// Returns a fixed transcript naming the uploaded file.
#[derive(Debug, Default)]
pub struct MockTranscriptionEngine {
    delay: Duration,
}

impl MockTranscriptionEngine {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        _language: &str,
    ) -> Result<Transcript, TranscriptionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Transcript {
            text: format!("Mock transcript of {} ({} bytes)", filename, audio_data.len()),
            confidence: Some(MOCK_TRANSCRIPT_CONFIDENCE),
        })
    }
}

/// Produces a silent mono 16 kHz WAV whose length tracks the text.
#[derive(Debug, Default)]
pub struct MockSpeechSynthesizer;

const SAMPLE_RATE: u32 = 16_000;

fn silent_wav(samples: u32) -> Vec<u8> {
    let data_len = samples * 2;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        _voice: Option<&str>,
        speed: f32,
    ) -> Result<Vec<u8>, SpeechSynthesisError> {
        // 50 ms of audio per character at normal speed
        let samples = (text.chars().count() as f32 * SAMPLE_RATE as f32 * 0.05 / speed) as u32;
        Ok(silent_wav(samples))
    }

    async fn health_check(&self) -> Result<(), SpeechSynthesisError> {
        Ok(())
    }
}
