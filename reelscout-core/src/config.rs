//! Centralized configuration for Reelscout.
//!
//! All endpoints, identifiers and tunable timings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::fmt;
use std::time::Duration;

use crate::ReelscoutError;

/// Central configuration for all Reelscout components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ReelscoutConfig {
    pub catalog: CatalogConfig,
    pub backend: BackendConfig,
    pub credentials: Option<Credentials>,
    pub search: SearchConfig,
}

/// Movie catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog REST API
    pub base_url: String,
    /// Static API key sent as a query parameter
    pub api_key: Option<String>,
    /// Image CDN prefix used to build poster URLs
    pub image_base_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: "reelscout/0.1.0",
        }
    }
}

/// Hosted document database and auth service configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// REST endpoint including the API version segment
    pub endpoint: String,
    /// Project identifier sent with every request
    pub project_id: Option<String>,
    /// Database holding the search records collection
    pub database_id: Option<String>,
    /// Collection storing one document per search term
    pub collection_id: Option<String>,
    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nyc.cloud.appwrite.io/v1".to_string(),
            project_id: None,
            database_id: None,
            collection_id: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl BackendConfig {
    /// Whether every identifier needed to talk to the backend is present.
    pub fn is_complete(&self) -> bool {
        self.project_id.is_some() && self.database_id.is_some() && self.collection_id.is_some()
    }
}

/// Static login credentials used by session bootstrap.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Search interaction configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period before a typed query is considered settled
    pub debounce_delay: Duration,
    /// Maximum number of trending records to display
    pub trending_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
            trending_limit: 5,
        }
    }
}

impl ReelscoutConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Catalog configuration overrides
        if let Ok(api_key) = std::env::var("TMDB_API_KEY") {
            config.catalog.api_key = non_empty(api_key);
        }

        if let Ok(base_url) = std::env::var("TMDB_BASE_URL") {
            config.catalog.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("REELSCOUT_HTTP_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.catalog.request_timeout = Duration::from_secs(seconds);
                config.backend.request_timeout = Duration::from_secs(seconds);
            }
        }

        // Backend configuration overrides
        if let Ok(endpoint) = std::env::var("APPWRITE_ENDPOINT") {
            config.backend.endpoint = endpoint;
        }

        config.backend.project_id = std::env::var("APPWRITE_PROJECT_ID").ok().and_then(non_empty);
        config.backend.database_id = std::env::var("APPWRITE_DATABASE_ID")
            .ok()
            .and_then(non_empty);
        config.backend.collection_id = std::env::var("APPWRITE_COLLECTION_ID")
            .ok()
            .and_then(non_empty);

        let email = std::env::var("REELSCOUT_EMAIL").ok().and_then(non_empty);
        let password = std::env::var("REELSCOUT_PASSWORD").ok().and_then(non_empty);
        if let (Some(email), Some(password)) = (email, password) {
            config.credentials = Some(Credentials { email, password });
        }

        // Search configuration overrides
        if let Ok(delay) = std::env::var("REELSCOUT_DEBOUNCE_MS") {
            if let Ok(millis) = delay.parse::<u64>() {
                config.search.debounce_delay = Duration::from_millis(millis);
            }
        }

        if let Ok(limit) = std::env::var("REELSCOUT_TRENDING_LIMIT") {
            if let Ok(limit) = limit.parse::<u32>() {
                config.search.trending_limit = limit;
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    pub fn for_testing() -> Self {
        Self {
            catalog: CatalogConfig {
                api_key: Some("test-key".to_string()),
                ..Default::default()
            },
            backend: BackendConfig {
                project_id: Some("test-project".to_string()),
                database_id: Some("test-database".to_string()),
                collection_id: Some("test-collection".to_string()),
                ..Default::default()
            },
            credentials: Some(Credentials {
                email: "tester@example.com".to_string(),
                password: "correct-horse".to_string(),
            }),
            search: SearchConfig {
                debounce_delay: Duration::from_millis(50),
                trending_limit: 5,
            },
        }
    }

    /// Checks the settings without which the application cannot search.
    ///
    /// Missing backend identifiers are tolerated; they only disable trending
    /// and search tracking.
    ///
    /// # Errors
    ///
    /// - `ReelscoutError::Configuration` - Catalog API key is missing
    pub fn validate(&self) -> Result<(), ReelscoutError> {
        if self.catalog.api_key.is_none() {
            return Err(ReelscoutError::Configuration {
                reason: "TMDB_API_KEY is not set".to_string(),
            });
        }

        if !self.backend.is_complete() {
            tracing::warn!("Backend identifiers incomplete, trending and tracking disabled");
        }

        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ReelscoutConfig::default();

        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog.image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.backend.endpoint, "https://nyc.cloud.appwrite.io/v1");
        assert_eq!(config.search.debounce_delay, Duration::from_millis(500));
        assert_eq!(config.search.trending_limit, 5);
        assert!(config.credentials.is_none());
        assert!(!config.backend.is_complete());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            email: "me@example.com".to_string(),
            password: "hunter2".to_string(),
        };

        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("me@example.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_validate_requires_catalog_key() {
        let config = ReelscoutConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ReelscoutError::Configuration { .. })
        ));

        assert!(ReelscoutConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("TMDB_API_KEY", "abc123");
            std::env::set_var("APPWRITE_PROJECT_ID", "project");
            std::env::set_var("APPWRITE_DATABASE_ID", "db");
            std::env::set_var("APPWRITE_COLLECTION_ID", " ");
            std::env::set_var("REELSCOUT_EMAIL", "me@example.com");
            std::env::set_var("REELSCOUT_PASSWORD", "secret");
            std::env::set_var("REELSCOUT_DEBOUNCE_MS", "250");
            std::env::set_var("REELSCOUT_TRENDING_LIMIT", "not-a-number");
        }

        let config = ReelscoutConfig::from_env();

        assert_eq!(config.catalog.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.backend.project_id.as_deref(), Some("project"));
        assert_eq!(config.backend.database_id.as_deref(), Some("db"));
        assert_eq!(config.backend.collection_id, None);
        assert_eq!(
            config.credentials.as_ref().map(|c| c.email.as_str()),
            Some("me@example.com")
        );
        assert_eq!(config.search.debounce_delay, Duration::from_millis(250));
        assert_eq!(config.search.trending_limit, 5);

        // Cleanup
        unsafe {
            std::env::remove_var("TMDB_API_KEY");
            std::env::remove_var("APPWRITE_PROJECT_ID");
            std::env::remove_var("APPWRITE_DATABASE_ID");
            std::env::remove_var("APPWRITE_COLLECTION_ID");
            std::env::remove_var("REELSCOUT_EMAIL");
            std::env::remove_var("REELSCOUT_PASSWORD");
            std::env::remove_var("REELSCOUT_DEBOUNCE_MS");
            std::env::remove_var("REELSCOUT_TRENDING_LIMIT");
        }
    }
}
