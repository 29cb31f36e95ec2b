use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::{ChatError, ConversationError};
use crate::domain::{ConversationId, MessageRole};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::{error_response, json_rejection_response};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub response: String,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub messages: Vec<MessageView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ConversationSummaryView {
    pub conversation_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
    pub last_message: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummaryView>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteConversationResponse {
    pub message: String,
}

fn not_found(id: &ConversationId) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "Conversation not found",
        Some(format!("No conversation with id {}", id)),
    )
}

#[tracing::instrument(skip(state, body))]
pub async fn send_message_handler(
    State(state): State<AppState>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };
    tracing::debug!(message = %sanitize_prompt(&request.message), "Processing chat message");

    let conversation_id = request
        .conversation_id
        .filter(|id| !id.trim().is_empty())
        .map(ConversationId::from_raw);

    match state
        .chat_service
        .send_message(&request.message, conversation_id)
        .await
    {
        Ok(reply) => (
            StatusCode::OK,
            Json(SendMessageResponse {
                response: reply.response,
                conversation_id: reply.conversation_id.to_string(),
                timestamp: reply.timestamp,
            }),
        )
            .into_response(),
        Err(ChatError::InvalidInput(reason)) => {
            tracing::warn!(reason = %reason, "Rejected chat message");
            error_response(StatusCode::BAD_REQUEST, "Invalid message", Some(reason))
        }
        Err(ChatError::Conversation(ConversationError::NotFound(id))) => {
            tracing::warn!(conversation_id = %id, "Chat message for unknown conversation");
            not_found(&id)
        }
        Err(ChatError::Completion(e)) => {
            tracing::error!(error = %e, "Chat completion failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error while processing the message",
                None,
            )
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_conversation_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Response {
    let id = ConversationId::from_raw(conversation_id);

    match state.chat_service.store().get(&id) {
        Ok(conversation) => {
            let messages: Vec<MessageView> = conversation
                .messages
                .into_iter()
                .map(|m| MessageView {
                    role: m.role,
                    content: m.content,
                    timestamp: m.created_at,
                })
                .collect();

            (
                StatusCode::OK,
                Json(ConversationResponse {
                    conversation_id: conversation.id.to_string(),
                    message_count: messages.len(),
                    messages,
                    created_at: conversation.created_at,
                    updated_at: conversation.updated_at,
                }),
            )
                .into_response()
        }
        Err(ConversationError::NotFound(id)) => not_found(&id),
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_conversation_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Response {
    let id = ConversationId::from_raw(conversation_id);

    if state.chat_service.store().delete(&id) {
        tracing::info!(conversation_id = %id, "Conversation deleted");
        (
            StatusCode::OK,
            Json(DeleteConversationResponse {
                message: format!("Conversation {} deleted", id),
            }),
        )
            .into_response()
    } else {
        not_found(&id)
    }
}

pub async fn list_conversations_handler(State(state): State<AppState>) -> impl IntoResponse {
    let conversations: Vec<ConversationSummaryView> = state
        .chat_service
        .store()
        .list_all()
        .into_iter()
        .map(|s| ConversationSummaryView {
            conversation_id: s.id.to_string(),
            created_at: s.created_at,
            updated_at: s.updated_at,
            message_count: s.message_count,
            last_message: s.last_message_preview,
        })
        .collect();

    Json(ConversationListResponse {
        total_count: conversations.len(),
        conversations,
    })
}
