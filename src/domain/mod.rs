mod conversation;
mod conversation_id;
mod conversation_summary;
mod message;
mod message_role;
mod prompt_message;

pub use conversation::Conversation;
pub use conversation_id::ConversationId;
pub use conversation_summary::ConversationSummary;
pub use message::Message;
pub use message_role::MessageRole;
pub use prompt_message::PromptMessage;
