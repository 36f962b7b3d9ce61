//! crates/scholar_core/src/error.rs
//!
//! The error taxonomy for the core. Catalog and session operations fail
//! fast with one of these kinds; the query engine never fails.

/// A typed error for all core operations.
///
/// `Authentication` means no valid session; `Authorization` means a valid
/// session with insufficient role or ownership. The boundary layer is
/// responsible for translating these into user-visible responses and must
/// not suppress them.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Authentication required: {0}")]
    Authentication(String),
    #[error("Not authorized: {0}")]
    Authorization(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;
