//! Error types for the stats cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Stats Error Enum ==
/// Unified error type for the cache, the upstream client and the proxy.
#[derive(Error, Debug)]
pub enum StatsError {
    /// Backing storage could not be read or written
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored line is not `<timestamp> -//- <json>`
    #[error("Malformed cache entry: {0}")]
    Decode(String),

    /// Upstream API answered with a non-2xx status
    #[error("Upstream returned HTTP {status} for {endpoint}")]
    Upstream { status: u16, endpoint: String },

    /// Upstream could not be reached or sent an unreadable body
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// Invalid request data or configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Route or resource not handled by the proxy
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        StatsError::Transport(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = match &self {
            StatsError::Io(_) | StatsError::Decode(_) | StatsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            StatsError::Upstream { status: 404, .. } => StatusCode::NOT_FOUND,
            StatsError::Upstream { .. } | StatsError::Transport(_) => StatusCode::BAD_GATEWAY,
            StatsError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StatsError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the stats cache.
pub type Result<T> = std::result::Result<T, StatsError>;
