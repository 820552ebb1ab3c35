//! Progress tracking for one attempt.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::{LogEntry, ProgressState, PropertyUpdate};
use crate::ports::{Clock, JobHandle};

/// Keeps the attempt's [`ProgressState`] and forwards every change to the
/// job's persistence.
///
/// Nothing here fails. Calls that make no sense yet (incrementing before
/// `init_progress`) are dropped, and `init_progress` only takes effect once.
pub struct ProgressTracker {
    handle: Arc<dyn JobHandle>,
    clock: Arc<dyn Clock>,
    state: Mutex<ProgressState>,
}

impl ProgressTracker {
    pub fn new(handle: Arc<dyn JobHandle>, clock: Arc<dyn Clock>) -> Self {
        Self {
            handle,
            clock,
            state: Mutex::new(ProgressState::default()),
        }
    }

    pub fn init_progress(&self, total_steps: u64, eta_epoch_millis: i64) {
        let snapshot = {
            let mut state = self.lock();
            if state.started {
                debug!(job_id = %self.handle.job_id(), "progress already initialised");
                return;
            }
            *state = ProgressState {
                started: true,
                steps_done: 0,
                steps_total: total_steps,
                eta_epoch_millis,
            };
            *state
        };
        self.forward(snapshot);
    }

    pub fn increment_progress_count(&self, delta: u64) {
        let snapshot = {
            let mut state = self.lock();
            if !state.started {
                return;
            }
            state.steps_done = state.steps_done.saturating_add(delta);
            *state
        };
        self.forward(snapshot);
    }

    pub fn update_progress(&self, eta_epoch_millis: i64) {
        let snapshot = {
            let mut state = self.lock();
            if !state.started {
                return;
            }
            state.eta_epoch_millis = eta_epoch_millis;
            *state
        };
        self.forward(snapshot);
    }

    /// Append a job log line. Forwarded whether or not progress has started.
    pub fn log(&self, message: impl Into<String>, args: Vec<serde_json::Value>) {
        let entry = LogEntry {
            message: message.into(),
            args,
            logged_at: self.clock.now(),
        };
        debug!(job_id = %self.handle.job_id(), message = %entry.message, "job log");
        self.handle.persist(PropertyUpdate::Log(entry));
    }

    pub fn snapshot(&self) -> ProgressState {
        *self.lock()
    }

    fn forward(&self, snapshot: ProgressState) {
        debug!(
            job_id = %self.handle.job_id(),
            steps_done = snapshot.steps_done,
            steps_total = snapshot.steps_total,
            "progress"
        );
        self.handle.persist(PropertyUpdate::Progress(snapshot));
    }

    // Only plain field writes happen under this lock, so a poisoned guard still
    // holds a consistent state.
    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use crate::testing::RecordingHandle;
    use chrono::DateTime;
    use serde_json::json;

    fn tracker() -> (Arc<RecordingHandle>, ProgressTracker) {
        let handle = Arc::new(RecordingHandle::new());
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let tracker = ProgressTracker::new(handle.clone(), Arc::new(FixedClock(at)));
        (handle, tracker)
    }

    #[test]
    fn only_first_init_counts() {
        let (handle, tracker) = tracker();

        tracker.init_progress(10, 5_000);
        tracker.increment_progress_count(3);
        tracker.init_progress(99, 9_999);
        tracker.init_progress(1, 1);

        let state = tracker.snapshot();
        assert_eq!(state.steps_total, 10);
        assert_eq!(state.eta_epoch_millis, 5_000);
        assert_eq!(state.steps_done, 3);
        // init + increment; the repeated inits persist nothing
        assert_eq!(handle.progress_updates().len(), 2);
    }

    #[test]
    fn updates_before_init_are_dropped() {
        let (handle, tracker) = tracker();

        tracker.increment_progress_count(4);
        tracker.update_progress(123);

        assert_eq!(tracker.snapshot(), ProgressState::default());
        assert!(handle.updates().is_empty());
    }

    #[test]
    fn increments_accumulate() {
        let (handle, tracker) = tracker();

        tracker.init_progress(20, 0);
        for step in [1, 4, 2, 7] {
            tracker.increment_progress_count(step);
        }

        assert_eq!(tracker.snapshot().steps_done, 14);
        let done: Vec<u64> = handle
            .progress_updates()
            .iter()
            .map(|p| p.steps_done)
            .collect();
        assert_eq!(done, vec![0, 1, 5, 7, 14]);
    }

    #[test]
    fn update_progress_replaces_eta() {
        let (handle, tracker) = tracker();

        tracker.init_progress(3, 1_000);
        tracker.update_progress(2_000);

        let last = handle.progress_updates().pop().unwrap();
        assert!(last.started);
        assert_eq!(last.eta_epoch_millis, 2_000);
    }

    #[test]
    fn log_is_forwarded_without_init() {
        let (handle, tracker) = tracker();

        tracker.log("copied {} of {}", vec![json!(3), json!(8)]);

        let updates = handle.updates();
        assert_eq!(updates.len(), 1);
        match &updates[0] {
            PropertyUpdate::Log(entry) => {
                assert_eq!(entry.message, "copied {} of {}");
                assert_eq!(entry.args, vec![json!(3), json!(8)]);
                assert_eq!(entry.logged_at.timestamp_millis(), 1_700_000_000_000);
            }
            other => panic!("expected log entry, got {other:?}"),
        }
    }
}
