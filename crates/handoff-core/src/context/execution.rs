//! ExecutionContext - the object a unit of work talks to during one attempt.

use std::sync::Arc;

use tracing::{error, info};

use super::latch::{CompletionLatch, Rejected};
use super::progress::ProgressTracker;
use crate::domain::{AttemptId, ExecutionResult, HandoffError, JobId, ProgressState, TerminalState};
use crate::ports::{Clock, CompletionSink, JobHandle, SystemClock};

/// Handed to the unit of work at the start of an attempt.
///
/// Progress, logging and the stop query are meant for the worker thread that
/// owns the attempt (`is_stopped` may also be polled from elsewhere).
/// `finish_async` may be called from any thread, once, and only after the
/// attempt went async. A call from another thread while `process` is still
/// running waits for it to return.
///
/// Share it as `Arc<ExecutionContext>` when the work hands completion to
/// another thread.
pub struct ExecutionContext {
    attempt_id: AttemptId,
    handle: Arc<dyn JobHandle>,
    progress: ProgressTracker,
    latch: Arc<CompletionLatch>,
    sink: Arc<dyn CompletionSink>,
}

impl ExecutionContext {
    pub fn new(
        attempt_id: AttemptId,
        handle: Arc<dyn JobHandle>,
        latch: Arc<CompletionLatch>,
        sink: Arc<dyn CompletionSink>,
    ) -> Self {
        Self::with_clock(attempt_id, handle, latch, sink, Arc::new(SystemClock))
    }

    pub fn with_clock(
        attempt_id: AttemptId,
        handle: Arc<dyn JobHandle>,
        latch: Arc<CompletionLatch>,
        sink: Arc<dyn CompletionSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let progress = ProgressTracker::new(Arc::clone(&handle), clock);
        Self {
            attempt_id,
            handle,
            progress,
            latch,
            sink,
        }
    }

    pub fn job_id(&self) -> JobId {
        self.handle.job_id()
    }

    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    /// Start progress reporting. Only the first call per attempt has an effect.
    pub fn init_progress(&self, total_steps: u64, eta_epoch_millis: i64) {
        self.progress.init_progress(total_steps, eta_epoch_millis);
    }

    /// Add `delta` finished steps. Ignored before `init_progress`.
    pub fn increment_progress_count(&self, delta: u64) {
        self.progress.increment_progress_count(delta);
    }

    /// Replace the ETA. Ignored before `init_progress`.
    pub fn update_progress(&self, eta_epoch_millis: i64) {
        self.progress.update_progress(eta_epoch_millis);
    }

    pub fn log(&self, message: impl Into<String>, args: Vec<serde_json::Value>) {
        self.progress.log(message, args);
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_stopped()
    }

    pub fn progress(&self) -> ProgressState {
        self.progress.snapshot()
    }

    /// Report the end of an asynchronously processed attempt.
    ///
    /// The first call on an armed attempt classifies `result` against the stop
    /// flag as it is right now, delivers the state to the completion sink and
    /// returns it. Any other call is a caller bug and returns an error without
    /// notifying anyone; that includes calling it from inside a `process` that
    /// has not returned yet.
    ///
    /// Do not join a thread that calls this from inside `process`: that thread
    /// waits for `process` to return.
    pub fn finish_async(&self, result: ExecutionResult) -> Result<TerminalState, HandoffError> {
        let job_id = self.job_id();
        let delivered = self.latch.complete_with(|| {
            let state = result.classify(self.handle.is_stopped());
            self.sink.finished(job_id, state);
            state
        });

        match delivered {
            Ok(state) => {
                info!(
                    %job_id,
                    attempt_id = %self.attempt_id,
                    outcome = ?result.outcome,
                    %state,
                    "async processing finished"
                );
                Ok(state)
            }
            Err(rejected) => {
                let err = match rejected {
                    Rejected::NotArmed => HandoffError::NotAsync { job_id },
                    Rejected::AlreadyCompleted => HandoffError::AlreadyFinished { job_id },
                };
                error!(%job_id, attempt_id = %self.attempt_id, error = %err, "finish_async rejected");
                Err(err)
            }
        }
    }
}
