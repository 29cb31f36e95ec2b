use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::infrastructure::system::ResourceSnapshot;
use crate::presentation::state::AppState;

pub const SERVICE_NAME: &str = "assistant-gateway";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

const GIB: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Collaborator failures dominate resource saturation.
pub fn overall_status(llm_ok: bool, voice_ok: bool, saturated: bool) -> HealthStatus {
    if !llm_ok || !voice_ok {
        HealthStatus::Unhealthy
    } else if saturated {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

#[derive(Serialize)]
pub struct LivenessResponse {
    pub status: HealthStatus,
}

pub async fn liveness_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: HealthStatus::Healthy,
        }),
    )
}

#[derive(Serialize)]
pub struct ResourceUsage {
    pub cpu_usage: String,
    pub memory_usage: String,
    pub disk_usage: String,
}

impl From<&ResourceSnapshot> for ResourceUsage {
    fn from(snapshot: &ResourceSnapshot) -> Self {
        Self {
            cpu_usage: format!("{:.1}%", snapshot.cpu_usage_percent),
            memory_usage: format!("{:.1}%", snapshot.memory_usage_percent()),
            disk_usage: format!("{:.1}%", snapshot.disk_usage_percent()),
        }
    }
}

#[derive(Serialize)]
pub struct HealthDetails {
    pub llm_service: HealthStatus,
    pub voice_service: HealthStatus,
    pub system: HealthStatus,
    #[serde(flatten)]
    pub resources: Option<ResourceUsage>,
}

#[derive(Serialize)]
pub struct SystemHealthResponse {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub details: HealthDetails,
}

fn reachability_status(ok: bool) -> HealthStatus {
    if ok {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    }
}

#[tracing::instrument(skip(state))]
pub async fn system_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (llm, voice, snapshot) = tokio::join!(
        state.llm_client.health_check(),
        state.voice_service.health_check(),
        state.resource_monitor.sample(),
    );

    if let Err(e) = &llm {
        tracing::error!(error = %e, "LLM health check failed");
    }
    if let Err(e) = &voice {
        tracing::error!(error = %e, "Voice health check failed");
    }

    let saturated = snapshot.as_ref().is_some_and(ResourceSnapshot::is_saturated);
    let status = overall_status(llm.is_ok(), voice.is_ok(), saturated);

    Json(SystemHealthResponse {
        status,
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        timestamp: Utc::now(),
        details: HealthDetails {
            llm_service: reachability_status(llm.is_ok()),
            voice_service: reachability_status(voice.is_ok()),
            system: if saturated {
                HealthStatus::Degraded
            } else {
                HealthStatus::Healthy
            },
            resources: snapshot.as_ref().map(ResourceUsage::from),
        },
    })
}

#[derive(Serialize)]
pub struct HostInfo {
    pub cpu_cores: usize,
    pub cpu_usage: String,
    pub memory_total: String,
    pub memory_used: String,
    pub memory_usage: String,
    pub disk_total: String,
    pub disk_used: String,
    pub disk_usage: String,
}

#[derive(Serialize)]
pub struct SupportedModels {
    pub chat: String,
    pub speech_to_text: String,
    pub text_to_speech: String,
}

#[derive(Serialize)]
pub struct SystemInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<HostInfo>,
    pub features: Vec<&'static str>,
    pub supported_models: SupportedModels,
    pub supported_languages: Vec<&'static str>,
}

fn host_info(snapshot: &ResourceSnapshot) -> HostInfo {
    let usage = ResourceUsage::from(snapshot);
    HostInfo {
        cpu_cores: snapshot.cpu_cores,
        cpu_usage: usage.cpu_usage,
        memory_total: format!("{}GB", snapshot.memory_total_bytes / GIB),
        memory_used: format!("{}GB", snapshot.memory_used_bytes / GIB),
        memory_usage: usage.memory_usage,
        disk_total: format!("{}GB", snapshot.disk_total_bytes / GIB),
        disk_used: format!("{}GB", snapshot.disk_used_bytes / GIB),
        disk_usage: usage.disk_usage,
    }
}

pub async fn system_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.resource_monitor.sample().await;

    Json(SystemInfoResponse {
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        environment: state.environment.to_string(),
        timestamp: Utc::now(),
        system: snapshot.as_ref().map(host_info),
        features: vec![
            "Conversational chat",
            "Speech to text",
            "Text to speech",
            "REST API",
        ],
        supported_models: SupportedModels {
            chat: state.settings.llm.chat_model.clone(),
            speech_to_text: state.settings.voice.stt_model.clone(),
            text_to_speech: state.settings.voice.tts_model.clone(),
        },
        supported_languages: vec!["es", "en"],
    })
}

#[derive(Serialize)]
pub struct SystemStatsResponse {
    pub conversations_active: usize,
    pub total_messages: usize,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

pub async fn system_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.chat_service.store().stats();

    Json(SystemStatsResponse {
        conversations_active: stats.conversations,
        total_messages: stats.total_messages,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}

/// Configuration with every credential left out.
#[derive(Serialize)]
pub struct PublicConfigResponse {
    pub service: &'static str,
    pub environment: String,
    pub assistant_name: String,
    pub default_language: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub supported_models: SupportedModels,
}

pub async fn system_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    let settings = &state.settings;

    Json(PublicConfigResponse {
        service: SERVICE_NAME,
        environment: state.environment.to_string(),
        assistant_name: settings.assistant.name.clone(),
        default_language: settings.assistant.language.clone(),
        max_tokens: settings.llm.max_tokens,
        temperature: settings.llm.temperature,
        supported_models: SupportedModels {
            chat: settings.llm.chat_model.clone(),
            speech_to_text: settings.voice.stt_model.clone(),
            text_to_speech: settings.voice.tts_model.clone(),
        },
    })
}
