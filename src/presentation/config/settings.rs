use config::Environment as EnvironmentSource;
use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub assistant: AssistantSettings,
    pub llm: LlmSettings,
    pub voice: VoiceSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantSettings {
    pub name: String,
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub provider: ProviderSetting,
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceSettings {
    pub provider: ProviderSetting,
    pub api_key: String,
    pub base_url: String,
    pub stt_model: String,
    pub tts_model: String,
    pub default_voice: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.{environment}.toml` (optional)
    /// and `APP_*` environment variables, e.g. `APP_LLM__CHAT_MODEL`.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let openai_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("assistant.name", "AssistantAI")?
            .set_default("assistant.language", "en")?
            .set_default("llm.provider", "openai")?
            .set_default("llm.api_key", openai_key.as_str())?
            .set_default("llm.base_url", "https://api.openai.com/v1")?
            .set_default("llm.chat_model", "gpt-4")?
            .set_default("llm.max_tokens", 4000)?
            .set_default("llm.temperature", 0.7)?
            .set_default("llm.timeout_seconds", 30)?
            .set_default("voice.provider", "openai")?
            .set_default("voice.api_key", openai_key.as_str())?
            .set_default("voice.base_url", "https://api.openai.com/v1")?
            .set_default("voice.stt_model", "whisper-1")?
            .set_default("voice.tts_model", "tts-1")?
            .set_default("voice.default_voice", "alloy")?
            .set_default("voice.timeout_seconds", 60)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
