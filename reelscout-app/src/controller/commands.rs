//! Command definitions for the controller actor.

use reelscout_core::{AuthError, SearchRecord, User};
use reelscout_search::{CatalogError, CatalogQuery, Movie};
use tokio::sync::oneshot;

use crate::view::SessionState;

/// Commands that can be sent to the controller actor.
///
/// Each command carries a response channel for the actor to send back
/// results once the command has been applied.
pub enum ControllerCommand {
    /// Run session bootstrap, at most once per controller.
    Bootstrap {
        responder: oneshot::Sender<SessionState>,
    },
    /// Attempt the static-credential login again.
    RetryLogin {
        responder: oneshot::Sender<Result<User, AuthError>>,
    },
    /// Issue a catalog query for a settled search text.
    SubmitQuery {
        text: String,
        responder: Option<oneshot::Sender<u64>>,
    },
    /// Reload the trending list.
    RefreshTrending {
        responder: oneshot::Sender<Vec<SearchRecord>>,
    },
    /// End the current session.
    Logout { responder: oneshot::Sender<()> },
    /// Hide the authentication advisory.
    DismissAdvisory { responder: oneshot::Sender<()> },
    /// Wait for background work, then stop the actor.
    Shutdown { responder: oneshot::Sender<()> },
}

/// Outcome of a catalog fetch, reported back to the actor.
#[derive(Debug)]
pub struct QueryCompletion {
    pub request_id: u64,
    pub query: CatalogQuery,
    pub result: Result<Vec<Movie>, CatalogError>,
}
