//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, plus the
//! mapping from core errors to HTTP responses.

use axum::http::StatusCode;
use scholar_core::error::CoreError;
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the core.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Translates a core error into the HTTP response a handler returns.
///
/// The one rule: authorization and validation failures must reach the
/// caller as what they are, never flattened into a generic 500.
pub fn core_error_response(err: CoreError) -> (StatusCode, String) {
    let status = match &err {
        CoreError::Authentication(_) => StatusCode::UNAUTHORIZED,
        CoreError::Authorization(_) => StatusCode::FORBIDDEN,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Unexpected core error: {:?}", err);
        return (status, "Internal server error".to_string());
    }
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_core_error_kind_maps_to_its_status() {
        let cases = [
            (CoreError::Authentication("x".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Authorization("x".into()), StatusCode::FORBIDDEN),
            (CoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (CoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
        ];
        for (err, want) in cases {
            assert_eq!(core_error_response(err).0, want);
        }
    }

    #[test]
    fn unexpected_errors_do_not_leak_details() {
        let (status, body) = core_error_response(CoreError::Unexpected("pool gone".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("pool gone"));
    }
}
