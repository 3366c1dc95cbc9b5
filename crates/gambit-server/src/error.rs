//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gambit_session::{SessionError, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A session store operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Rate limit exceeded.
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ServerError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Session(e) => session_status(e),
            ServerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn session_status(error: &SessionError) -> StatusCode {
    match error {
        SessionError::Validation(ValidationError::MoveTooLong { .. }) => StatusCode::FORBIDDEN,
        SessionError::Validation(_) => StatusCode::BAD_REQUEST,
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::TooManySessions => StatusCode::TOO_MANY_REQUESTS,
        SessionError::KeyExhausted => StatusCode::SERVICE_UNAVAILABLE,
        SessionError::SessionFull
        | SessionError::MoveLimit
        | SessionError::GameOver
        | SessionError::AlreadyJoined
        | SessionError::NotParticipant => StatusCode::FORBIDDEN,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ServerError::Internal(detail) => {
                tracing::error!(status = %status, error = %detail, "Server error");
                "internal error".to_string()
            }
            _ => {
                let message = self.to_string();
                tracing::warn!(status = %status, error = %message, "Client error");
                message
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
