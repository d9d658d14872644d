//! Search-count tracking and trending retrieval.
//!
//! One search record exists per distinct search term. New terms are created
//! under a document identifier derived from the term itself, so two writers
//! racing on the same new term collide on the identifier instead of creating
//! duplicates; the loser re-reads the winner's record and increments it.
//! Increments are read-modify-write and can still lose an update when two
//! sessions bump the same term at the same moment.

use std::sync::Arc;

use sha1::{Digest, Sha1};

use crate::backend::{
    BackendError, DataAuthBackend, DocumentQuery, NewSearchRecord, SearchRecord, SearchRecordPatch,
};

/// Maximum identifier length accepted by the backend.
const MAX_DOCUMENT_ID_LEN: usize = 36;

/// Result of recording one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// First occurrence of the term.
    Created(SearchRecord),
    /// Existing record with its count bumped by one.
    Incremented(SearchRecord),
}

impl TrackOutcome {
    /// Record as stored after the operation.
    pub fn record(&self) -> &SearchRecord {
        match self {
            TrackOutcome::Created(record) | TrackOutcome::Incremented(record) => record,
        }
    }
}

/// Builds a poster URL from the image CDN prefix and a catalog poster path.
///
/// The path is appended verbatim after a separator, matching the URLs already
/// stored for existing records.
pub fn poster_url(image_base_url: &str, poster_path: &str) -> String {
    format!("{image_base_url}/{poster_path}")
}

/// Deterministic document identifier for a search term.
pub fn record_id(search_term: &str) -> String {
    let digest = Sha1::digest(search_term.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(MAX_DOCUMENT_ID_LEN);
    id
}

/// Records searches and reads the most searched terms.
#[derive(Debug, Clone)]
pub struct SearchTracker {
    backend: Arc<dyn DataAuthBackend>,
    image_base_url: String,
}

impl SearchTracker {
    /// Creates a tracker writing through `backend`.
    pub fn new(backend: Arc<dyn DataAuthBackend>, image_base_url: impl Into<String>) -> Self {
        Self {
            backend,
            image_base_url: image_base_url.into(),
        }
    }

    /// Counts one search for `search_term` whose top result was `movie_id`.
    ///
    /// Existing records get `count + 1`; new terms get a record with count 1
    /// capturing the top result and its poster URL.
    ///
    /// # Errors
    /// - `BackendError::Unauthorized` - Session expired
    /// - `BackendError::Network` - Backend unreachable
    /// - `BackendError::Http` - Backend rejected a read or write
    pub async fn record_search(
        &self,
        search_term: &str,
        movie_id: u64,
        poster_path: Option<&str>,
    ) -> Result<TrackOutcome, BackendError> {
        if let Some(existing) = self.find(search_term).await? {
            return self.increment(existing).await;
        }

        let record = NewSearchRecord {
            search_term: search_term.to_string(),
            count: 1,
            movie_id,
            poster_url: poster_path.map(|path| poster_url(&self.image_base_url, path)),
        };

        match self
            .backend
            .create_document(&record_id(search_term), &record)
            .await
        {
            Ok(created) => {
                tracing::debug!("Created search record for '{search_term}'");
                Ok(TrackOutcome::Created(created))
            }
            Err(BackendError::Conflict) => {
                tracing::debug!("Search record for '{search_term}' created concurrently");
                let existing = self
                    .find(search_term)
                    .await?
                    .ok_or(BackendError::Conflict)?;
                self.increment(existing).await
            }
            Err(e) => Err(e),
        }
    }

    /// Most searched records, highest count first, at most `limit` of them.
    ///
    /// Failures are logged and yield an empty list.
    pub async fn trending(&self, limit: u32) -> Vec<SearchRecord> {
        if limit == 0 {
            return Vec::new();
        }

        let queries = [DocumentQuery::most_searched(), DocumentQuery::Limit(limit)];
        match self.backend.list_documents(&queries).await {
            Ok(list) => {
                let mut records = list.documents;
                records.sort_by(|a, b| b.count.cmp(&a.count));
                records.truncate(limit as usize);
                records
            }
            Err(e) => {
                tracing::warn!("Error fetching trending searches: {e}");
                Vec::new()
            }
        }
    }

    async fn find(&self, search_term: &str) -> Result<Option<SearchRecord>, BackendError> {
        let queries = [DocumentQuery::search_term(search_term), DocumentQuery::Limit(1)];
        let list = self.backend.list_documents(&queries).await?;
        Ok(list.documents.into_iter().next())
    }

    async fn increment(&self, existing: SearchRecord) -> Result<TrackOutcome, BackendError> {
        let patch = SearchRecordPatch {
            count: existing.count.saturating_add(1),
        };
        let updated = self.backend.update_document(&existing.id, &patch).await?;
        tracing::debug!(
            "Search record for '{}' now at {}",
            updated.search_term,
            updated.count
        );
        Ok(TrackOutcome::Incremented(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn record(id: &str, term: &str, count: u32) -> SearchRecord {
        SearchRecord {
            id: id.to_string(),
            search_term: term.to_string(),
            count,
            movie_id: 1,
            poster_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn tracker(backend: &InMemoryBackend) -> SearchTracker {
        SearchTracker::new(Arc::new(backend.clone()), IMAGE_BASE)
    }

    #[test]
    fn test_poster_url_template() {
        assert_eq!(
            poster_url(IMAGE_BASE, "/x.jpg"),
            "https://image.tmdb.org/t/p/w500//x.jpg"
        );
    }

    #[test]
    fn test_record_id_is_stable_and_bounded() {
        let id = record_id("batman");

        assert_eq!(id, record_id("batman"));
        assert_ne!(id, record_id("Batman"));
        assert_eq!(id.len(), MAX_DOCUMENT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_new_term_creates_single_record() {
        let backend = InMemoryBackend::new().with_active_session();

        let outcome = tracker(&backend)
            .record_search("batman", 1, Some("/x.jpg"))
            .await
            .unwrap();

        assert!(matches!(outcome, TrackOutcome::Created(_)));
        let records = backend.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].search_term, "batman");
        assert_eq!(records[0].count, 1);
        assert_eq!(records[0].movie_id, 1);
        assert_eq!(
            records[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500//x.jpg")
        );
    }

    #[tokio::test]
    async fn test_missing_poster_path_stores_no_url() {
        let backend = InMemoryBackend::new();

        tracker(&backend).record_search("heat", 949, None).await.unwrap();

        assert_eq!(backend.records()[0].poster_url, None);
    }

    #[tokio::test]
    async fn test_existing_term_increments_by_one() {
        let backend = InMemoryBackend::new().with_records(vec![
            record("a", "batman", 4),
            record("b", "alien", 2),
        ]);

        let outcome = tracker(&backend)
            .record_search("batman", 99, Some("/other.jpg"))
            .await
            .unwrap();

        assert_eq!(outcome.record().count, 5);
        let records = backend.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].count, 5);
        assert_eq!(records[0].movie_id, 1);
        assert_eq!(records[1].count, 2);
        assert_eq!(backend.call_counts().create_document, 0);
    }

    #[tokio::test]
    async fn test_concurrent_create_falls_back_to_increment() {
        let backend = InMemoryBackend::new();
        backend.inject_conflict_on_next_create(record("winner", "dune", 1));

        let outcome = tracker(&backend).record_search("dune", 438631, None).await.unwrap();

        assert!(matches!(outcome, TrackOutcome::Incremented(_)));
        let records = backend.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "winner");
        assert_eq!(records[0].count, 2);
    }

    #[tokio::test]
    async fn test_backend_failure_is_returned() {
        let backend = InMemoryBackend::new();
        backend.set_fail_documents(true);

        let result = tracker(&backend).record_search("batman", 1, None).await;

        assert!(matches!(result, Err(BackendError::Http { status: 500, .. })));
        assert!(backend.records().is_empty());
    }

    #[tokio::test]
    async fn test_trending_is_sorted_and_limited() {
        let records = (1..=8)
            .map(|n| record(&format!("id{n}"), &format!("term{n}"), n * 3 % 11 + 1))
            .collect();
        let backend = InMemoryBackend::new().with_records(records);

        let trending = tracker(&backend).trending(5).await;

        assert_eq!(trending.len(), 5);
        assert!(trending.windows(2).all(|pair| pair[0].count >= pair[1].count));
    }

    #[tokio::test]
    async fn test_trending_failure_yields_empty_list() {
        let backend = InMemoryBackend::new().with_records(vec![record("a", "batman", 4)]);
        backend.set_fail_documents(true);

        assert!(tracker(&backend).trending(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_skips_backend() {
        let backend = InMemoryBackend::new();

        assert!(tracker(&backend).trending(0).await.is_empty());
        assert_eq!(backend.call_counts().list_documents, 0);
    }
}
