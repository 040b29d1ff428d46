use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Wrong file type or missing file. Raised before any state change.
    #[error("{0}")]
    InvalidUpload(String),

    /// The upload exceeded the configured body limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The AI reply did not contain a usable JSON object.
    #[error("Failed to parse AI response: {0}")]
    Parse(String),

    /// The AI explicitly reported an error; the message is passed through as-is.
    #[error("{0}")]
    Analysis(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("AI service is not ready yet")]
    NotReady,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUpload(_) => "INVALID_UPLOAD",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Parse(_) => "PARSE_ERROR",
            AppError::Analysis(_) => "ANALYSIS_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::NotReady => "NOT_READY",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the user. Internal faults are masked.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Llm(_) => "The AI service could not be reached".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Parse(msg) => {
                tracing::warn!("AI response rejected: {msg}");
                StatusCode::BAD_GATEWAY
            }
            AppError::Analysis(msg) => {
                tracing::warn!("AI reported an error: {msg}");
                StatusCode::BAD_GATEWAY
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                StatusCode::BAD_GATEWAY
            }
            AppError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}
