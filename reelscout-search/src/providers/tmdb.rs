//! TMDB catalog provider for production use.

use async_trait::async_trait;
use reelscout_core::config::CatalogConfig;
use url::Url;

use super::CatalogProvider;
use crate::errors::CatalogError;
use crate::types::{CatalogPage, CatalogQuery, Movie};

/// TMDB provider authenticating with a static API key.
#[derive(Debug, Clone)]
pub struct TmdbCatalog {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl TmdbCatalog {
    /// Creates a TMDB provider from catalog configuration.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Configuration` - Missing API key, invalid base URL, or
    ///   the HTTP client could not be built
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| CatalogError::Configuration {
                reason: "TMDB_API_KEY is not set".to_string(),
            })?;

        let base_url = Url::parse(&config.base_url).map_err(|e| CatalogError::Configuration {
            reason: format!("invalid catalog URL {}: {e}", config.base_url),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::Configuration {
                reason: format!("catalog URL {} cannot be a base URL", config.base_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| CatalogError::Configuration {
                reason: format!("HTTP client creation failed: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Builds the request URL for a query, API key included.
    fn request_url(&self, query: &CatalogQuery) -> Url {
        let mut url = self.base_url.clone();
        let segments: [&str; 2] = match query {
            CatalogQuery::Search(_) => ["search", "movie"],
            CatalogQuery::Discover => ["discover", "movie"],
        };
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        {
            let mut pairs = url.query_pairs_mut();
            match query {
                CatalogQuery::Search(text) => pairs.append_pair("query", text),
                CatalogQuery::Discover => pairs.append_pair("sort_by", "popularity.desc"),
            };
            pairs.append_pair("api_key", &self.api_key);
        }

        url
    }
}

#[async_trait]
impl CatalogProvider for TmdbCatalog {
    async fn fetch_movies(&self, query: &CatalogQuery) -> Result<Vec<Movie>, CatalogError> {
        tracing::debug!("Fetching catalog results for {query:?}");

        let response = self
            .client
            .get(self.request_url(query))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Network {
                // Strip the URL so the API key never ends up in messages
                reason: format!("catalog request failed: {}", e.without_url()),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| CatalogError::Network {
            reason: format!("reading catalog response failed: {}", e.without_url()),
        })?;

        let page: CatalogPage = serde_json::from_str(&body).map_err(|e| CatalogError::Parse {
            reason: format!("unexpected catalog response shape: {e}"),
        })?;

        Ok(page.results)
    }
}
