//! Controller state and the operations applied by the actor.

use std::sync::Arc;

use reelscout_core::backend::restore_or_login;
use reelscout_core::config::Credentials;
use reelscout_core::{AuthError, DataAuthBackend, ReelscoutConfig, SearchRecord, SearchTracker, User};
use reelscout_search::{CatalogError, CatalogProvider, CatalogQuery, Movie};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};

use super::commands::QueryCompletion;
use crate::view::{SessionState, ViewState};

/// State owned by the controller actor.
pub(super) struct AppController {
    credentials: Option<Credentials>,
    trending_limit: u32,
    catalog: Arc<dyn CatalogProvider>,
    backend: Arc<dyn DataAuthBackend>,
    tracker: SearchTracker,
    view: ViewState,
    view_sender: watch::Sender<ViewState>,
    bootstrapped: bool,
    latest_request: u64,
    completions: mpsc::UnboundedSender<QueryCompletion>,
    pub(super) background: JoinSet<()>,
}

impl AppController {
    pub(super) fn new(
        config: ReelscoutConfig,
        catalog: Arc<dyn CatalogProvider>,
        backend: Arc<dyn DataAuthBackend>,
        completions: mpsc::UnboundedSender<QueryCompletion>,
        view_sender: watch::Sender<ViewState>,
    ) -> Self {
        let tracker = SearchTracker::new(Arc::clone(&backend), config.catalog.image_base_url);

        Self {
            credentials: config.credentials,
            trending_limit: config.search.trending_limit,
            catalog,
            backend,
            tracker,
            view: ViewState::default(),
            view_sender,
            bootstrapped: false,
            latest_request: 0,
            completions,
            background: JoinSet::new(),
        }
    }

    fn publish(&self) {
        self.view_sender.send_replace(self.view.clone());
    }

    /// Restores or creates a session the first time it is called.
    ///
    /// Later calls return the settled state without touching the backend.
    pub(super) async fn bootstrap(&mut self) -> SessionState {
        if !self.bootstrapped {
            self.bootstrapped = true;
            tracing::info!("Bootstrapping session");
            if let Err(e) = self.authenticate().await {
                tracing::warn!("Continuing without authentication: {e}");
            }
        }
        self.view.session.clone()
    }

    /// Runs one login attempt, replacing any earlier outcome.
    pub(super) async fn retry_login(&mut self) -> Result<User, AuthError> {
        self.bootstrapped = true;
        self.authenticate().await
    }

    async fn authenticate(&mut self) -> Result<User, AuthError> {
        match restore_or_login(self.backend.as_ref(), self.credentials.as_ref()).await {
            Ok(user) => {
                self.view.session = SessionState::Authenticated(user.clone());
                self.view.advisory = None;
                self.view.trending = self.tracker.trending(self.trending_limit).await;
                self.publish();
                Ok(user)
            }
            Err(e) => {
                self.view.session = SessionState::Unauthenticated;
                self.view.advisory = Some(e.to_string());
                self.view.trending.clear();
                self.publish();
                Err(e)
            }
        }
    }

    /// Issues a catalog query and returns its request number.
    pub(super) fn submit_query(&mut self, text: String) -> u64 {
        self.latest_request += 1;
        let request_id = self.latest_request;
        let query = CatalogQuery::from_text(&text);
        tracing::debug!("Issuing request {request_id}: {query:?}");

        self.view.is_loading = true;
        self.view.error_message = None;
        self.publish();

        let catalog = Arc::clone(&self.catalog);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let fetch_query = query.clone();
            let fetch = tokio::spawn(async move { catalog.fetch_movies(&fetch_query).await });
            let result = fetch.await.unwrap_or_else(|e| {
                Err(CatalogError::Network {
                    reason: format!("catalog task failed: {e}"),
                })
            });

            let _ = completions.send(QueryCompletion {
                request_id,
                query,
                result,
            });
        });

        request_id
    }

    /// Applies a fetch result unless a newer request has been issued since.
    pub(super) fn apply_completion(&mut self, completion: QueryCompletion) {
        let QueryCompletion {
            request_id,
            query,
            result,
        } = completion;

        if request_id != self.latest_request {
            tracing::debug!(
                "Discarding stale response for request {request_id} (latest {})",
                self.latest_request
            );
            return;
        }

        self.view.is_loading = false;
        match result {
            Ok(movies) => {
                tracing::debug!("Request {request_id} returned {} movies", movies.len());
                self.view.error_message = None;
                if let (Some(term), Some(top)) = (query.search_term(), movies.first()) {
                    if self.view.session.is_authenticated() {
                        self.spawn_tracking(term.to_string(), top);
                    }
                }
                self.view.movies = movies;
            }
            Err(e) => {
                tracing::warn!("Catalog query failed: {e}");
                self.view.movies.clear();
                self.view.error_message = Some(e.user_message());
            }
        }
        self.publish();
    }

    /// Records the search in the background; failures are only logged.
    fn spawn_tracking(&mut self, term: String, top: &Movie) {
        let tracker = self.tracker.clone();
        let movie_id = top.id;
        let poster_path = top.poster_path.clone();

        self.background.spawn(async move {
            match tracker
                .record_search(&term, movie_id, poster_path.as_deref())
                .await
            {
                Ok(outcome) => tracing::debug!(
                    "Tracked search '{term}', count now {}",
                    outcome.record().count
                ),
                Err(e) => tracing::warn!("Error updating search count for '{term}': {e}"),
            }
        });
    }

    /// Reloads trending records, or clears them without a session.
    pub(super) async fn refresh_trending(&mut self) -> Vec<SearchRecord> {
        if self.view.session.is_authenticated() {
            self.view.trending = self.tracker.trending(self.trending_limit).await;
        } else {
            self.view.trending.clear();
        }
        self.publish();
        self.view.trending.clone()
    }

    /// Ends the session; backend failures are logged, never surfaced.
    pub(super) async fn logout(&mut self) {
        if let Err(e) = self.backend.delete_current_session().await {
            tracing::warn!("Error logging out: {e}");
        }
        self.view.session = SessionState::Unauthenticated;
        self.view.trending.clear();
        self.publish();
    }

    pub(super) fn dismiss_advisory(&mut self) {
        self.view.advisory = None;
        self.publish();
    }

    /// Waits for every outstanding background task.
    pub(super) async fn drain_background(&mut self) {
        while let Some(joined) = self.background.join_next().await {
            log_background_result(joined);
        }
    }
}

/// Logs a background task that ended abnormally.
pub(super) fn log_background_result(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!("Background task panicked: {e}");
        } else {
            tracing::debug!("Background task cancelled: {e}");
        }
    }
}
