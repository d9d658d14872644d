//! Actor implementation for the application controller.

use std::sync::Arc;

use reelscout_core::{DataAuthBackend, ReelscoutConfig};
use reelscout_search::CatalogProvider;
use tokio::sync::{mpsc, watch};

use super::commands::{ControllerCommand, QueryCompletion};
use super::core::{AppController, log_background_result};
use super::handle::ControllerHandle;
use crate::view::ViewState;

/// Spawns the controller actor and returns its handle.
///
/// The actor owns all application state and applies commands one at a time.
/// Catalog fetches and search tracking run as separate tasks whose results
/// are fed back into the actor, so no command waits on the network except
/// the session operations.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() {
/// use std::sync::Arc;
/// use reelscout_app::spawn_controller;
/// use reelscout_core::ReelscoutConfig;
/// use reelscout_core::backend::DisabledBackend;
/// use reelscout_search::TmdbCatalog;
///
/// let config = ReelscoutConfig::from_env();
/// let catalog = TmdbCatalog::new(&config.catalog).unwrap();
/// let backend = DisabledBackend::new("backend not configured");
/// let handle = spawn_controller(config, Arc::new(catalog), Arc::new(backend));
/// handle.bootstrap().await.unwrap();
/// # }
/// ```
pub fn spawn_controller(
    config: ReelscoutConfig,
    catalog: Arc<dyn CatalogProvider>,
    backend: Arc<dyn DataAuthBackend>,
) -> ControllerHandle {
    let (sender, receiver) = mpsc::channel(100);
    let (completion_sender, completion_receiver) = mpsc::unbounded_channel();
    let (view_sender, view_receiver) = watch::channel(ViewState::default());
    let controller = AppController::new(config, catalog, backend, completion_sender, view_sender);

    tokio::spawn(async move {
        run_actor_loop(controller, receiver, completion_receiver).await;
    });

    ControllerHandle::new(sender, view_receiver)
}

/// Runs the main actor message processing loop.
///
/// Stops when every handle has been dropped or a shutdown command arrives.
async fn run_actor_loop(
    mut controller: AppController,
    mut receiver: mpsc::Receiver<ControllerCommand>,
    mut completions: mpsc::UnboundedReceiver<QueryCompletion>,
) {
    tracing::debug!("Controller actor started");

    loop {
        tokio::select! {
            command = receiver.recv() => match command {
                Some(command) => {
                    if !handle_command(&mut controller, command).await {
                        break;
                    }
                }
                None => break,
            },
            Some(completion) = completions.recv() => {
                controller.apply_completion(completion);
            }
            Some(joined) = controller.background.join_next() => {
                log_background_result(joined);
            }
        }
    }

    tracing::debug!("Controller actor stopped");
}

/// Handles a single command.
/// Returns true to continue processing, false to shutdown.
async fn handle_command(controller: &mut AppController, command: ControllerCommand) -> bool {
    match command {
        ControllerCommand::Bootstrap { responder } => {
            let session = controller.bootstrap().await;
            let _ = responder.send(session);
        }

        ControllerCommand::RetryLogin { responder } => {
            let result = controller.retry_login().await;
            let _ = responder.send(result);
        }

        ControllerCommand::SubmitQuery { text, responder } => {
            let request_id = controller.submit_query(text);
            if let Some(responder) = responder {
                let _ = responder.send(request_id);
            }
        }

        ControllerCommand::RefreshTrending { responder } => {
            let trending = controller.refresh_trending().await;
            let _ = responder.send(trending);
        }

        ControllerCommand::Logout { responder } => {
            controller.logout().await;
            let _ = responder.send(());
        }

        ControllerCommand::DismissAdvisory { responder } => {
            controller.dismiss_advisory();
            let _ = responder.send(());
        }

        ControllerCommand::Shutdown { responder } => {
            tracing::info!("Controller shutting down");
            controller.drain_background().await;
            let _ = responder.send(());
            return false;
        }
    }

    true
}
