//! Provider implementations for catalog queries.

use async_trait::async_trait;

use crate::errors::CatalogError;
use crate::types::{CatalogQuery, Movie};

#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;
pub mod tmdb;

#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedCatalog;
pub use tmdb::TmdbCatalog;

/// Trait for movie catalog providers.
///
/// Implementations answer search and discovery queries through different
/// backends (the real catalog API, scripted providers for testing).
#[async_trait]
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    /// Fetches the movies matching a catalog query.
    ///
    /// # Errors
    /// - `CatalogError::Http` - Catalog returned a non-success status
    /// - `CatalogError::Network` - Network connectivity issues
    /// - `CatalogError::Parse` - Response did not match the expected schema
    async fn fetch_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, CatalogError>;
}
