//! Reelscout Search - Movie catalog search and discovery

#![deny(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Read-only client for the external movie catalog: free-text search,
//! popularity-ordered discovery, and a typed movie model validated at the
//! service boundary.

pub mod errors;
pub mod providers;
pub mod types;

// Re-export main types
pub use errors::CatalogError;
pub use providers::{CatalogProvider, TmdbCatalog};
#[cfg(any(test, feature = "test-utils"))]
pub use providers::ScriptedCatalog;
pub use types::{CatalogPage, CatalogQuery, Movie};

/// Convenience type alias for Results with CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;
