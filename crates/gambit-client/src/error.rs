//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Game not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of a server-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the server refused the request for game rules or capacity.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// Check if this is a rate limit or session-ceiling error.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error response from the server.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}
