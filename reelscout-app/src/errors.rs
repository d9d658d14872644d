//! Error types for controller operations.

use reelscout_core::AuthError;
use thiserror::Error;

/// Errors returned through the controller handle.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Login attempt failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Command queue is full; the command was dropped.
    #[error("Controller is busy, command dropped")]
    Busy,

    /// Controller actor is no longer running.
    #[error("Controller has shut down")]
    ControllerShutdown,
}
