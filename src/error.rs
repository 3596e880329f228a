//! Error types for the governance layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Governor Error Enum ==
/// Unified error type for the governance layer.
#[derive(Error, Debug)]
pub enum GovernorError {
    /// Key not found in the TTL store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown sensitive-operation class
    #[error("Unknown operation class: {0}")]
    UnknownClass(String),

    /// A manifest resource failed to fetch during install.
    ///
    /// The only fault that crosses the proxy's public boundary; the host
    /// is expected to retry installation rather than accept a partial shell.
    #[error("Install failed: {0}")]
    InstallFailed(String),

    /// Operation attempted in a lifecycle state that does not permit it
    #[error("Proxy lifecycle error: {0}")]
    Lifecycle(String),

    /// Outbound network fetch failed
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for GovernorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GovernorError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            GovernorError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            GovernorError::UnknownClass(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            GovernorError::InstallFailed(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            GovernorError::Lifecycle(msg) => (StatusCode::CONFLICT, msg.clone()),
            GovernorError::FetchFailed { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            GovernorError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the governance layer.
pub type Result<T> = std::result::Result<T, GovernorError>;
