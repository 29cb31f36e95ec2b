use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body shared by every non-2xx API response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub code: u16,
}

pub fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: Option<String>,
) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            details,
            code: status.as_u16(),
        }),
    )
        .into_response()
}

/// Malformed or mistyped JSON bodies get the shared error shape instead of
/// axum's plain-text rejection.
pub fn json_rejection_response(rejection: JsonRejection) -> Response {
    tracing::warn!(
        status = %rejection.status(),
        error = %rejection.body_text(),
        "Rejected request body"
    );
    error_response(
        StatusCode::BAD_REQUEST,
        "Invalid request body",
        Some(rejection.body_text()),
    )
}
