use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::VoiceError;
use crate::presentation::state::AppState;

use super::error::{error_response, json_rejection_response};

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
    pub language: String,
    pub confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
    #[serde(default)]
    pub voice_model: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub audio_data: String,
    pub duration: f32,
}

#[derive(Debug, Serialize)]
pub struct VoiceReplyResponse {
    pub transcription: String,
    pub response_text: String,
    pub audio_response: String,
    pub duration: f32,
}

struct UploadedAudio {
    filename: String,
    data: Vec<u8>,
}

/// Reads the first multipart field that carries a filename.
async fn read_audio_upload(multipart: &mut Multipart) -> Result<UploadedAudio, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                tracing::warn!("Voice request with no file");
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "No audio file uploaded",
                    None,
                ));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "Failed to read multipart body",
                    Some(e.to_string()),
                ));
            }
        };

        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        return match field.bytes().await {
            Ok(data) => Ok(UploadedAudio {
                filename,
                data: data.to_vec(),
            }),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read upload bytes");
                Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "Failed to read uploaded file",
                    Some(e.to_string()),
                ))
            }
        };
    }
}

fn voice_error_response(error: VoiceError, context: &str) -> Response {
    match error {
        VoiceError::InvalidInput(reason) => {
            tracing::warn!(reason = %reason, "Rejected voice request");
            error_response(StatusCode::BAD_REQUEST, "Invalid voice request", Some(reason))
        }
        other => {
            tracing::error!(error = %other, "{} failed", context);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error during {}", context),
                None,
            )
        }
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let upload = match read_audio_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    match state
        .voice_service
        .transcribe(&upload.filename, &upload.data)
        .await
    {
        Ok(transcription) => (
            StatusCode::OK,
            Json(TranscriptionResponse {
                text: transcription.text,
                language: transcription.language,
                confidence: transcription.confidence,
            }),
        )
            .into_response(),
        Err(e) => voice_error_response(e, "transcription"),
    }
}

#[tracing::instrument(skip(state, body))]
pub async fn speak_handler(
    State(state): State<AppState>,
    body: Result<Json<SpeakRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };
    match state
        .voice_service
        .speak(&request.text, request.voice_model.as_deref(), request.speed)
        .await
    {
        Ok(speech) => (
            StatusCode::OK,
            Json(SpeakResponse {
                audio_data: speech.audio_base64,
                duration: speech.duration_seconds,
            }),
        )
            .into_response(),
        Err(e) => voice_error_response(e, "speech synthesis"),
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_and_respond_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let upload = match read_audio_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    match state
        .voice_service
        .transcribe_and_respond(&upload.filename, &upload.data)
        .await
    {
        Ok(reply) => (
            StatusCode::OK,
            Json(VoiceReplyResponse {
                transcription: reply.transcription,
                response_text: reply.response_text,
                audio_response: reply.audio_base64,
                duration: reply.duration_seconds,
            }),
        )
            .into_response(),
        Err(e) => voice_error_response(e, "voice round trip"),
    }
}
