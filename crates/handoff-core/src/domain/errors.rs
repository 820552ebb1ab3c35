//! Error taxonomy.
//!
//! Everything here is a caller contract violation or a dispatcher-side
//! failure. Recoverable job failures are never errors: they travel as
//! [`TerminalState::QueuedForRetry`](super::TerminalState::QueuedForRetry).

use std::time::Duration;

use thiserror::Error;

use super::ids::JobId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandoffError {
    /// `finish_async` on an attempt that never declared itself asynchronous.
    #[error("job is not processed async: {job_id}")]
    NotAsync { job_id: JobId },

    /// `finish_async` called a second time for the same attempt.
    #[error("async processing already finished: {job_id}")]
    AlreadyFinished { job_id: JobId },

    /// The async work went away without ever finishing.
    #[error("completion dropped before a state was delivered: {job_id}")]
    CompletionDropped { job_id: JobId },

    #[error("consumer panicked for {job_id}: {message}")]
    ConsumerPanicked { job_id: JobId, message: String },

    #[error("no completion for {job_id} after {waited:?}")]
    CompletionTimedOut { job_id: JobId, waited: Duration },
}

impl HandoffError {
    /// Is this a bug in the calling unit of work (as opposed to the dispatcher)?
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            HandoffError::NotAsync { .. } | HandoffError::AlreadyFinished { .. }
        )
    }
}
