//! Application controller built on the actor model.
//!
//! A single actor task owns the view state and applies commands one at a
//! time, so the result list and trending list have exactly one writer.
//! Catalog fetches run in their own tasks and report back tagged with a
//! request number; only the most recently issued request is applied.

mod actor;
mod commands;
mod core;
mod handle;

pub use actor::spawn_controller;
pub use handle::ControllerHandle;
