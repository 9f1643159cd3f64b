use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use beerstock_core::DomainError;

/// Everything a handler can fail with, already shaped for the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Body missing, not JSON, or lacking a required field.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Path segment that should be a numeric id isn't.
    #[error("invalid beer id: {0}")]
    InvalidId(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(e) => domain_error_to_response(e),
            ApiError::InvalidPayload(msg) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_payload", msg)
            }
            ApiError::InvalidId(raw) => json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                format!("invalid beer id: {raw}"),
            ),
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::DuplicateName(_) => json_error(StatusCode::CONFLICT, "duplicate_name", message),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::CapacityExceeded { .. } => {
            json_error(StatusCode::BAD_REQUEST, "capacity_exceeded", message)
        }
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        DomainError::Store(_) => {
            tracing::error!(error = %message, "store failure while serving request");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
