//! Handle for communicating with the controller actor.

use reelscout_core::{SearchRecord, User};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};

use super::commands::ControllerCommand;
use crate::errors::ControllerError;
use crate::view::{SessionState, ViewState};

/// Handle for communicating with the controller actor.
///
/// Cheap to clone; every clone talks to the same actor and observes the same
/// view state.
#[derive(Clone)]
pub struct ControllerHandle {
    sender: mpsc::Sender<ControllerCommand>,
    view: watch::Receiver<ViewState>,
}

impl ControllerHandle {
    /// Creates a new handle from the actor's command sender and view channel.
    pub(crate) fn new(
        sender: mpsc::Sender<ControllerCommand>,
        view: watch::Receiver<ViewState>,
    ) -> Self {
        Self { sender, view }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> ControllerCommand,
    ) -> Result<R, ControllerError> {
        let (responder, rx) = oneshot::channel();

        self.sender
            .send(build(responder))
            .await
            .map_err(|_| ControllerError::ControllerShutdown)?;

        rx.await.map_err(|_| ControllerError::ControllerShutdown)
    }

    /// Restores an existing session or logs in with configured credentials.
    ///
    /// Runs at most once per controller; later calls return the settled
    /// session state. A failed login leaves the app usable in degraded mode
    /// and is reported through the view's advisory, not as an error.
    ///
    /// # Errors
    /// - `ControllerError::ControllerShutdown` - Actor is no longer running
    pub async fn bootstrap(&self) -> Result<SessionState, ControllerError> {
        self.request(|responder| ControllerCommand::Bootstrap { responder })
            .await
    }

    /// Attempts the credential login again.
    ///
    /// # Errors
    /// - `ControllerError::Auth` - Login failed; the app stays unauthenticated
    /// - `ControllerError::ControllerShutdown` - Actor is no longer running
    pub async fn retry_login(&self) -> Result<User, ControllerError> {
        Ok(self
            .request(|responder| ControllerCommand::RetryLogin { responder })
            .await??)
    }

    /// Issues a catalog query for `text` and returns its request number.
    ///
    /// Empty text queries the popularity-sorted discovery listing. Only the
    /// most recently issued request may update the results.
    ///
    /// # Errors
    /// - `ControllerError::ControllerShutdown` - Actor is no longer running
    pub async fn submit_query(&self, text: impl Into<String>) -> Result<u64, ControllerError> {
        let text = text.into();
        self.request(|responder| ControllerCommand::SubmitQuery {
            text,
            responder: Some(responder),
        })
        .await
    }

    /// Queues a catalog query without waiting.
    ///
    /// Usable from synchronous contexts such as debouncer callbacks.
    ///
    /// # Errors
    /// - `ControllerError::Busy` - Command queue is full
    /// - `ControllerError::ControllerShutdown` - Actor is no longer running
    pub fn try_submit_query(&self, text: impl Into<String>) -> Result<(), ControllerError> {
        let command = ControllerCommand::SubmitQuery {
            text: text.into(),
            responder: None,
        };

        self.sender.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => ControllerError::Busy,
            TrySendError::Closed(_) => ControllerError::ControllerShutdown,
        })
    }

    /// Reloads the trending list and returns it.
    ///
    /// Empty while unauthenticated or when the backend read fails.
    ///
    /// # Errors
    /// - `ControllerError::ControllerShutdown` - Actor is no longer running
    pub async fn refresh_trending(&self) -> Result<Vec<SearchRecord>, ControllerError> {
        self.request(|responder| ControllerCommand::RefreshTrending { responder })
            .await
    }

    /// Ends the current session. Backend failures are logged only.
    ///
    /// # Errors
    /// - `ControllerError::ControllerShutdown` - Actor is no longer running
    pub async fn logout(&self) -> Result<(), ControllerError> {
        self.request(|responder| ControllerCommand::Logout { responder })
            .await
    }

    /// Hides the authentication advisory.
    ///
    /// # Errors
    /// - `ControllerError::ControllerShutdown` - Actor is no longer running
    pub async fn dismiss_advisory(&self) -> Result<(), ControllerError> {
        self.request(|responder| ControllerCommand::DismissAdvisory { responder })
            .await
    }

    /// Current view state.
    pub fn snapshot(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }

    /// Waits until no catalog query is in flight and returns that state.
    ///
    /// # Errors
    /// - `ControllerError::ControllerShutdown` - Actor stopped while waiting
    pub async fn wait_for_results(&self) -> Result<ViewState, ControllerError> {
        let mut view = self.view.clone();
        let state = view
            .wait_for(|state| !state.is_loading)
            .await
            .map_err(|_| ControllerError::ControllerShutdown)?;
        Ok(state.clone())
    }

    /// Waits for outstanding background work, then stops the actor.
    ///
    /// # Errors
    /// - `ControllerError::ControllerShutdown` - Actor already stopped
    pub async fn shutdown(&self) -> Result<(), ControllerError> {
        self.request(|responder| ControllerCommand::Shutdown { responder })
            .await
    }

    /// Whether the actor is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}
