//! Reelscout App - Application controller and views

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
//!
//! Owns the user-visible state of the movie discovery application: session
//! bootstrap, catalog queries with stale-response protection, background
//! search tracking and trending refresh, all sequenced by a single actor.

pub mod controller;
pub mod errors;
pub mod search_box;
pub mod view;

// Re-export main types
pub use controller::{ControllerHandle, spawn_controller};
pub use errors::ControllerError;
pub use search_box::SearchBox;
pub use view::{SessionState, ViewState};
