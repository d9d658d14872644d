//! Debounced search input feeding the controller.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reelscout_core::Debouncer;

use crate::controller::ControllerHandle;

/// Search text input whose settled value drives catalog queries.
///
/// The raw text updates immediately on every keystroke. A query is issued
/// only once the text has been stable for the debounce delay, and only when
/// the settled value differs from the previously settled one.
pub struct SearchBox {
    text: Mutex<String>,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    /// Creates a search box submitting settled text through `handle`.
    pub fn new(handle: ControllerHandle, delay: Duration) -> Self {
        let last_settled: Arc<Mutex<Option<String>>> = Arc::default();

        let debouncer = Debouncer::new(delay, move |text: String| {
            let mut last = last_settled.lock();
            if last.as_deref() == Some(text.as_str()) {
                tracing::trace!("Settled search text unchanged: '{text}'");
                return;
            }

            match handle.try_submit_query(text.clone()) {
                Ok(()) => *last = Some(text),
                Err(e) => tracing::warn!("Dropped settled search '{text}': {e}"),
            }
        });

        Self {
            text: Mutex::new(String::new()),
            debouncer,
        }
    }

    /// Replaces the raw input text.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        *self.text.lock() = text.clone();
        self.debouncer.push(text);
    }

    /// Raw input text as last entered.
    pub fn text(&self) -> String {
        self.text.lock().clone()
    }

    /// Whether the latest text is still waiting to settle.
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }
}
