//! Trailing-edge debouncing for rapidly changing input.
//!
//! Every pushed value cancels the pending delayed callback and schedules a new
//! one, so the callback only observes a value once the input has been stable
//! for the full delay. There is no leading edge.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

type SettledCallback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Delayed callback scheduled for the most recent value.
struct PendingEmit {
    task: JoinHandle<()>,
    deadline: Instant,
}

/// Cancellable delayed callback collapsing bursts of values into one.
///
/// Must be used from within a tokio runtime since each push spawns the
/// delayed callback as a task.
pub struct Debouncer<T> {
    delay: Duration,
    callback: SettledCallback<T>,
    pending: Mutex<Option<PendingEmit>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Creates a debouncer invoking `callback` with each settled value.
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Records a new input value, superseding any value not yet settled.
    pub fn push(&self, value: T) {
        let now = Instant::now();
        let deadline = now + self.delay;
        let callback = Arc::clone(&self.callback);

        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            // A callback whose deadline already passed has settled; let it fire.
            if now < previous.deadline {
                previous.task.abort();
            }
        }

        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            callback(value);
        });

        *pending = Some(PendingEmit { task, deadline });
    }

    /// Whether a value is waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }

    /// Drops the value waiting to settle, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.task.abort();
        }
    }

    /// Quiet period required before a value settles.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(previous) = self.pending.get_mut().take() {
            previous.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tokio::sync::mpsc;
    use tokio::time::sleep;

    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn recording_debouncer() -> (
        Debouncer<String>,
        mpsc::UnboundedReceiver<(String, Instant)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(DELAY, move |value: String| {
            let _ = tx.send((value, Instant::now()));
        });
        (debouncer, rx)
    }

    fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(item) = rx.try_recv() {
            items.push(item);
        }
        items
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_keystrokes_collapse_to_last_value() {
        let (debouncer, mut rx) = recording_debouncer();
        let start = Instant::now();

        for text in ["b", "ba", "bat"] {
            debouncer.push(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        assert!(debouncer.is_pending());

        sleep(Duration::from_secs(2)).await;

        let emitted = drain(&mut rx);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0, "bat");
        // Last keystroke at 200ms, settles one full delay later
        assert_eq!(emitted[0].1 - start, Duration::from_millis(700));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_emission_before_delay_elapses() {
        let (debouncer, mut rx) = recording_debouncer();

        debouncer.push("batman".to_string());
        sleep(Duration::from_millis(499)).await;
        assert!(drain(&mut rx).is_empty());

        sleep(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let (debouncer, mut rx) = recording_debouncer();

        debouncer.push("dune".to_string());
        debouncer.cancel();
        sleep(Duration::from_secs(1)).await;

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_value() {
        let (debouncer, mut rx) = recording_debouncer();

        debouncer.push("alien".to_string());
        drop(debouncer);
        sleep(Duration::from_secs(1)).await;

        assert!(drain(&mut rx).is_empty());
    }

    fn run_paused<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap()
            .block_on(future)
    }

    async fn replay(gaps: &[u64]) -> Vec<(String, Instant)> {
        let (debouncer, mut rx) = recording_debouncer();
        let mut last_push = Instant::now();

        for (index, gap) in gaps.iter().enumerate() {
            if index > 0 {
                sleep(Duration::from_millis(*gap)).await;
            }
            last_push = Instant::now();
            debouncer.push(format!("k{index}"));
        }
        sleep(DELAY * 2).await;

        let mut emitted = drain(&mut rx);
        emitted.push((String::new(), last_push));
        emitted
    }

    proptest! {
        #[test]
        fn prop_short_gaps_emit_once(gaps in prop::collection::vec(0u64..500, 1..12)) {
            let mut emitted = run_paused(replay(&gaps));
            let (_, last_push) = emitted.pop().unwrap();

            prop_assert_eq!(emitted.len(), 1);
            prop_assert_eq!(&emitted[0].0, &format!("k{}", gaps.len() - 1));
            prop_assert_eq!(emitted[0].1 - last_push, DELAY);
        }

        #[test]
        fn prop_long_gaps_emit_every_value(gaps in prop::collection::vec(500u64..2000, 1..8)) {
            let mut emitted = run_paused(replay(&gaps));
            emitted.pop();

            let values: Vec<String> = emitted.into_iter().map(|(value, _)| value).collect();
            let expected: Vec<String> = (0..gaps.len()).map(|index| format!("k{index}")).collect();
            prop_assert_eq!(values, expected);
        }
    }
}
