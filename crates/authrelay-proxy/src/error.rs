//! Error types for the relay.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Errors that can occur while relaying a token exchange.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Invalid inbound request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider returned a non-success status. The body is kept for logging
    /// only; callers just see that the exchange failed.
    #[error("Upstream provider error ({status})")]
    Upstream { status: u16, body: String },

    /// Network/transport error reaching the provider.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider response could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        RelayError::Network(e.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RelayError::InvalidRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_request"),
            RelayError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "upstream_error"),
            RelayError::Network(_) => (StatusCode::BAD_GATEWAY, "network_error"),
            RelayError::Serialization(_) => (StatusCode::BAD_GATEWAY, "serialization_error"),
            RelayError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };

        match &self {
            RelayError::InvalidRequest(_) => {
                tracing::warn!(status = %status, code, error = %self, "Client error");
            }
            RelayError::Upstream {
                status: upstream_status,
                body,
            } => {
                tracing::error!(
                    status = %status,
                    code,
                    upstream_status,
                    upstream_body = %body,
                    "Upstream exchange failed"
                );
            }
            _ => {
                tracing::error!(status = %status, code, error = %self, "Relay error");
            }
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
