//! Storyloom — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storyloom_core::error::{DomainError, ValidationError};
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The scenario store could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Every validation problem, for `invalid_scenario`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationError>>,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::AggregateNotFound(_) => (StatusCode::NOT_FOUND, "aggregate_not_found"),
            DomainError::SceneNotFound(_) => (StatusCode::NOT_FOUND, "scene_not_found"),
            DomainError::ConcurrencyConflict { .. } => {
                (StatusCode::CONFLICT, "concurrency_conflict")
            }
            DomainError::RevisionConflict { .. } => {
                (StatusCode::CONFLICT, "concurrency_conflict")
            }
            DomainError::DuplicateScene(_) => (StatusCode::CONFLICT, "duplicate_scene"),
            DomainError::InvalidStateTransition(_) => {
                (StatusCode::CONFLICT, "invalid_state_transition")
            }
            DomainError::Parse(_) => (StatusCode::BAD_REQUEST, "parse_error"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::InvalidScenario(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_scenario")
            }
            DomainError::NotPlayable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "not_playable"),
            DomainError::UnknownAttributeEffect(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unknown_attribute_effect")
            }
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let message = self.0.to_string();
        let details = match self.0 {
            DomainError::InvalidScenario(errors) => Some(errors),
            _ => None,
        };
        let body = ErrorBody {
            error: error_code,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}
