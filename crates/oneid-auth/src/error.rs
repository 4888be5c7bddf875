//! Error types for authentication context building
//!
//! Building a context only fails when the caller breaks the API contract
//! (missing payloads, unusable configuration). Optional data that cannot be
//! interpreted is omitted instead of producing an error.

use thiserror::Error;

/// Authentication error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A required payload or argument was absent, null, or not map-like
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An id token could not be decoded
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Shorthand for an [`AuthError::InvalidArgument`] naming the offending argument.
    pub(crate) fn invalid_argument(name: &str, reason: &str) -> Self {
        AuthError::InvalidArgument(format!("{}: {}", name, reason))
    }

    /// Check if this error should be logged at error level.
    ///
    /// Argument and token errors are caller mistakes and should not be
    /// logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::ConfigError(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidArgument(_) => 400,
            AuthError::InvalidToken(_) => 401,
            AuthError::ConfigError(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}
