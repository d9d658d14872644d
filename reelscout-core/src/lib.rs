//! Reelscout Core - Configuration, debouncing and search tracking
//!
//! This crate provides the building blocks shared by the catalog client and
//! the application controller: environment-driven configuration, tracing
//! setup, the trailing-edge search debouncer, and the data/auth backend
//! client used for session bootstrap and search-count tracking.

pub mod backend;
pub mod config;
pub mod debounce;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_server;
pub mod tracing_setup;
pub mod tracking;

// Re-export main types for convenient access
pub use backend::{
    AppwriteBackend, AuthError, BackendError, DataAuthBackend, DocumentQuery, NewSearchRecord,
    SearchRecord, SearchRecordPatch, User,
};
pub use config::ReelscoutConfig;
pub use debounce::Debouncer;
pub use tracking::SearchTracker;

/// Core errors that can bubble up from any Reelscout subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum ReelscoutError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelscoutError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            ReelscoutError::Backend(e) => match e {
                BackendError::Network { .. } => "Could not reach the backend service".to_string(),
                BackendError::Unauthorized => "Not signed in".to_string(),
                _ => "Backend error occurred".to_string(),
            },
            ReelscoutError::Auth(e) => e.to_string(),
            ReelscoutError::Configuration { reason } => format!("Configuration error: {reason}"),
            ReelscoutError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user-supplied configuration.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ReelscoutError::Configuration { .. } | ReelscoutError::Auth(AuthError::MissingCredentials)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReelscoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_backend_details() {
        let error = ReelscoutError::from(BackendError::Http {
            status: 500,
            message: "internal stack trace".to_string(),
        });

        assert_eq!(error.user_message(), "Backend error occurred");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_configuration_is_user_error() {
        let error = ReelscoutError::Configuration {
            reason: "TMDB_API_KEY is not set".to_string(),
        };

        assert!(error.is_user_error());
        assert!(error.user_message().contains("TMDB_API_KEY"));
    }
}
