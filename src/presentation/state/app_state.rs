use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::LlmClient;
use crate::application::services::{ChatService, VoiceService};
use crate::infrastructure::system::ResourceMonitor;
use crate::presentation::config::{Environment, Settings};

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub voice_service: Arc<VoiceService>,
    pub llm_client: Arc<dyn LlmClient>,
    pub resource_monitor: ResourceMonitor,
    pub settings: Arc<Settings>,
    pub environment: Environment,
    pub started_at: Instant,
}
