use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::services::MAX_AUDIO_BYTES;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    delete_conversation_handler, get_conversation_handler, list_conversations_handler,
    liveness_handler, send_message_handler, speak_handler, system_config_handler,
    system_health_handler, system_info_handler, system_stats_handler,
    transcribe_and_respond_handler, transcribe_handler,
};
use crate::presentation::state::AppState;

/// Headroom for multipart framing around the largest accepted audio file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let chat = Router::new()
        .route("/message", post(send_message_handler))
        .route("/conversations", get(list_conversations_handler))
        .route(
            "/conversations/{conversation_id}",
            get(get_conversation_handler).delete(delete_conversation_handler),
        );

    let voice = Router::new()
        .route("/transcribe", post(transcribe_handler))
        .route("/speak", post(speak_handler))
        .route(
            "/transcribe-and-respond",
            post(transcribe_and_respond_handler),
        )
        .layer(DefaultBodyLimit::max(
            MAX_AUDIO_BYTES + MULTIPART_OVERHEAD_BYTES,
        ));

    let system = Router::new()
        .route("/health", get(system_health_handler))
        .route("/info", get(system_info_handler))
        .route("/stats", get(system_stats_handler))
        .route("/config", get(system_config_handler));

    Router::new()
        .route("/health", get(liveness_handler))
        .nest("/api/v1/chat", chat)
        .nest("/api/v1/voice", voice)
        .nest("/api/v1/system", system)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
