//! Data types for catalog search results.

use serde::{Deserialize, Serialize};

/// Movie returned by a catalog query.
///
/// Only `id` is required; every descriptive field may be absent upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier
    pub id: u64,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Poster image path relative to the image CDN
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release date as `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average user rating out of 10
    #[serde(default)]
    pub vote_average: Option<f32>,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: Option<String>,
}

impl Movie {
    /// Release year extracted from the release date.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| year.len() == 4)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    /// Result items; absent results mean an empty page
    #[serde(default)]
    pub results: Vec<Movie>,
}

/// Request issued against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    /// Free-text title search.
    Search(String),
    /// Popular movies, most popular first.
    Discover,
}

impl CatalogQuery {
    /// Search for non-empty text, discovery otherwise.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            CatalogQuery::Discover
        } else {
            CatalogQuery::Search(text.to_string())
        }
    }

    /// Text searched for, if this is a search.
    pub fn search_term(&self) -> Option<&str> {
        match self {
            CatalogQuery::Search(term) => Some(term),
            CatalogQuery::Discover => None,
        }
    }
}
