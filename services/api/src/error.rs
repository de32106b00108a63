//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and the mapping
//! from core errors to HTTP responses used by the handlers.

use axum::http::StatusCode;
use study_tracker_core::domain::ValidationError;
use study_tracker_core::ports::PortError;
use study_tracker_core::tracker::TrackerError;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying database migrations at startup.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The error half of every handler's return type.
pub type HandlerError = (StatusCode, String);

/// Maps a port error to a response. Unexpected errors are logged and replaced with
/// a generic message naming only the failed `action`.
pub fn port_error(action: &str, e: PortError) -> HandlerError {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Invalid(v) => invalid(v),
        PortError::Unexpected(detail) => {
            error!("Failed to {}: {}", action, detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {}", action),
            )
        }
    }
}

pub fn invalid(e: ValidationError) -> HandlerError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

pub fn tracker_error(action: &str, e: TrackerError) -> HandlerError {
    match e {
        TrackerError::Validation(v) => invalid(v),
        TrackerError::Store(p) => port_error(action, p),
    }
}
