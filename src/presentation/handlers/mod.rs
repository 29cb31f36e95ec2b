mod chat;
pub mod error;
mod system;
mod voice;

pub use chat::{
    delete_conversation_handler, get_conversation_handler, list_conversations_handler,
    send_message_handler,
};
pub use error::ErrorResponse;
pub use system::{
    HealthStatus, SERVICE_NAME, SERVICE_VERSION, liveness_handler, overall_status,
    system_config_handler, system_health_handler, system_info_handler, system_stats_handler,
};
pub use voice::{speak_handler, transcribe_and_respond_handler, transcribe_handler};
