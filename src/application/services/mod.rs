mod chat_service;
mod conversation_store;
mod voice_service;

pub use chat_service::{ChatError, ChatReply, ChatService, MAX_MESSAGE_CHARS, chat_system_prompt};
pub use conversation_store::{
    ConversationError, ConversationStore, MAX_STORED_MESSAGES, PREVIEW_CHARS, PROMPT_WINDOW,
    StoreStats,
};
pub use voice_service::{
    MAX_AUDIO_BYTES, MAX_SPEECH_CHARS, SpeechAudio, Transcription, VoiceError, VoiceReply,
    VoiceService, estimate_speech_duration, is_audio_file,
};
