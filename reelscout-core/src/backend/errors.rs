//! Error types for the data/auth backend.

use thiserror::Error;

/// Errors returned by document and session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Backend could not be reached or the connection dropped.
    #[error("Network error: {reason}")]
    Network { reason: String },

    /// Backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// No valid session for the requested operation.
    #[error("Not authorized")]
    Unauthorized,

    /// A document with the requested identifier already exists.
    #[error("Document already exists")]
    Conflict,

    /// Response body did not match the expected schema.
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    /// Required project, database or collection identifiers are missing.
    #[error("Backend not configured: {reason}")]
    NotConfigured { reason: String },
}

/// Session bootstrap failures, shown to the user as an advisory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Login failed: {reason}")]
    LoginFailed { reason: String },

    #[error("Login failed: no credentials configured")]
    MissingCredentials,
}
