//! Scripted provider implementation for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CatalogProvider;
use crate::errors::CatalogError;
use crate::types::{CatalogQuery, Movie};

#[derive(Debug, Default)]
struct ScriptedState {
    responses: HashMap<CatalogQuery, Result<Vec<Movie>, CatalogError>>,
    delays: HashMap<CatalogQuery, Duration>,
    issued: Vec<CatalogQuery>,
}

/// Catalog provider answering from a script of canned responses.
///
/// Unscripted queries return an empty result list. Clones share the script
/// and the log of issued queries.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCatalog {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedCatalog {
    /// Creates a provider with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `query` with `movies`.
    pub fn with_results(self, query: CatalogQuery, movies: Vec<Movie>) -> Self {
        self.state.lock().responses.insert(query, Ok(movies));
        self
    }

    /// Answers `query` with `error`.
    pub fn with_error(self, query: CatalogQuery, error: CatalogError) -> Self {
        self.state.lock().responses.insert(query, Err(error));
        self
    }

    /// Delays the answer to `query` by `delay`.
    pub fn with_delay(self, query: CatalogQuery, delay: Duration) -> Self {
        self.state.lock().delays.insert(query, delay);
        self
    }

    /// Queries issued so far, in order.
    pub fn issued(&self) -> Vec<CatalogQuery> {
        self.state.lock().issued.clone()
    }

    /// Builds a minimal movie for scripts.
    pub fn movie(id: u64, title: &str, poster_path: Option<&str>) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: poster_path.map(str::to_string),
            release_date: None,
            vote_average: None,
            original_language: None,
        }
    }
}

#[async_trait]
impl CatalogProvider for ScriptedCatalog {
    async fn fetch_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, CatalogError> {
        let (delay, response) = {
            let mut state = self.state.lock();
            state.issued.push(query.clone());
            (
                state.delays.get(query).copied(),
                state.responses.get(query).cloned(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        response.unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_responses_and_log() {
        let batman = CatalogQuery::from_text("batman");
        let catalog = ScriptedCatalog::new()
            .with_results(
                batman.clone(),
                vec![ScriptedCatalog::movie(1, "Batman", Some("/x.jpg"))],
            )
            .with_error(CatalogQuery::Discover, CatalogError::Http { status: 503 });

        let movies = catalog.fetch_movies(&batman).await.unwrap();
        assert_eq!(movies[0].id, 1);

        let error = catalog.fetch_movies(&CatalogQuery::Discover).await.unwrap_err();
        assert_eq!(error, CatalogError::Http { status: 503 });

        let unscripted = catalog
            .fetch_movies(&CatalogQuery::from_text("alien"))
            .await
            .unwrap();
        assert!(unscripted.is_empty());

        assert_eq!(catalog.issued().len(), 3);
        assert_eq!(catalog.issued()[0], batman);
    }
}
