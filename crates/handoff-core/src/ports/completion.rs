//! CompletionSink port - how an async attempt reports back to the dispatcher.

use crate::domain::{JobId, TerminalState};

/// Receives the terminal state of an asynchronously finished attempt.
///
/// Called at most once per attempt. Implementations should only hand the
/// state off (channel send, flag flip); no I/O.
pub trait CompletionSink: Send + Sync {
    fn finished(&self, job_id: JobId, state: TerminalState);
}

impl<F> CompletionSink for F
where
    F: Fn(JobId, TerminalState) + Send + Sync,
{
    fn finished(&self, job_id: JobId, state: TerminalState) {
        self(job_id, state)
    }
}
