use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Error surface shared by every cell. Handlers convert their cell-local
/// error enums into this type so the HTTP mapping lives in one place.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The appointment was persisted but its invoice was not. The caller
    /// should retry invoice creation, not re-book the slot.
    #[error("Partial failure: appointment {appointment_id} saved without an invoice")]
    PartialFailure { appointment_id: Uuid },

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::PartialFailure { appointment_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "appointment saved but invoice creation failed",
                    "appointment_id": appointment_id,
                }),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
        };

        tracing::error!("Error: {}: {}", status, self);

        (status, Json(body)).into_response()
    }
}
