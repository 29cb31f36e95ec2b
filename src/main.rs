use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::net::TcpListener;

use assistant_gateway::application::services::{
    ChatService, ConversationStore, VoiceService, chat_system_prompt,
};
use assistant_gateway::infrastructure::audio::VoiceEngineFactory;
use assistant_gateway::infrastructure::llm::LlmClientFactory;
use assistant_gateway::infrastructure::observability::{TracingConfig, init_tracing};
use assistant_gateway::infrastructure::system::ResourceMonitor;
use assistant_gateway::presentation::{
    AppState, Environment, ScaffoldConfig, Settings, create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(&settings.logging, environment))?;

    let scaffold = ScaffoldConfig::from_env();
    if scaffold.enabled {
        tracing::warn!(
            delay_ms = scaffold.mock_response_delay.as_millis() as u64,
            "Scaffold mode enabled, external services are mocked"
        );
    }

    let llm_client = LlmClientFactory::create(
        scaffold.resolve(settings.llm.provider),
        &settings.llm,
        scaffold.mock_response_delay,
    )?;

    let voice_http = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.voice.timeout_seconds))
        .build()
        .context("failed to build voice HTTP client")?;
    let voice_engines = VoiceEngineFactory::create(
        scaffold.resolve(settings.voice.provider),
        &settings.voice,
        voice_http,
        scaffold.mock_response_delay,
    );

    let system_prompt = chat_system_prompt(&settings.assistant.name, &settings.assistant.language);

    let chat_service = Arc::new(ChatService::new(
        Arc::new(ConversationStore::new()),
        Arc::clone(&llm_client),
        system_prompt.clone(),
    ));
    let voice_service = Arc::new(VoiceService::new(
        voice_engines.transcription,
        voice_engines.synthesis,
        Arc::clone(&llm_client),
        settings.assistant.language.clone(),
        system_prompt,
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;

    let state = AppState {
        chat_service,
        voice_service,
        llm_client,
        resource_monitor: ResourceMonitor,
        settings: Arc::new(settings),
        environment,
        started_at: Instant::now(),
    };

    let router = create_router(state);

    tracing::info!(%addr, %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
