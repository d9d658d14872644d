//! Error types for catalog queries.

use thiserror::Error;

/// Errors that can occur while querying the movie catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Catalog answered with a non-success HTTP status.
    #[error("HTTP error! status: {status}")]
    Http {
        /// Status code returned by the catalog
        status: u16,
    },

    /// Catalog could not be reached or the connection dropped.
    #[error("Network error: {reason}")]
    Network {
        /// The reason for the network error
        reason: String,
    },

    /// Response body did not match the expected schema.
    #[error("Parse error: {reason}")]
    Parse {
        /// The reason for the parse error
        reason: String,
    },

    /// Client is missing required settings such as the API key.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// The missing or invalid setting
        reason: String,
    },
}

impl CatalogError {
    /// Inline message shown in place of the result list.
    pub fn user_message(&self) -> String {
        format!("Error fetching movies: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_includes_status() {
        let error = CatalogError::Http { status: 401 };

        assert_eq!(
            error.user_message(),
            "Error fetching movies: HTTP error! status: 401"
        );
    }
}
