//! AttemptRunner - runs one attempt and resolves its terminal state.
//!
//! # Flow
//! 1. allocate an AttemptId, build the latch and the ExecutionContext
//! 2. on a blocking thread, enter the latch's running phase and call
//!    `JobConsumer::process`
//! 3. `Done(result)`: settle the latch and classify on the spot
//! 4. `Async`: hand the latch off and wait for the ChannelSink to deliver
//!
//! A `finish_async` from another thread that arrives before `process` returns
//! waits for step 3 or 4, so the two paths never both complete.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::config::RunnerConfig;
use super::consumer::{JobConsumer, Processing};
use crate::context::{CompletionLatch, ExecutionContext};
use crate::domain::{AttemptId, HandoffError, JobId, TerminalState};
use crate::impls::ChannelSink;
use crate::ports::{Clock, JobHandle, SystemClock};

/// Which completion path the attempt took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPath {
    Sync,
    Async,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptReport {
    pub job_id: JobId,
    pub attempt_id: AttemptId,
    pub state: TerminalState,
    pub path: CompletionPath,
}

/// Single-attempt dispatcher. Worker pools and retry scheduling live above it.
pub struct AttemptRunner {
    config: RunnerConfig,
    clock: Arc<dyn Clock>,
}

impl AttemptRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn run(
        &self,
        consumer: Arc<dyn JobConsumer>,
        job: Arc<dyn JobHandle>,
    ) -> Result<AttemptReport, HandoffError> {
        let attempt_id = AttemptId::generate();
        let span = info_span!(
            "attempt",
            consumer = %self.config.consumer_name,
            job_id = %job.job_id(),
            %attempt_id,
        );
        self.run_attempt(consumer, job, attempt_id)
            .instrument(span)
            .await
    }

    async fn run_attempt(
        &self,
        consumer: Arc<dyn JobConsumer>,
        job: Arc<dyn JobHandle>,
        attempt_id: AttemptId,
    ) -> Result<AttemptReport, HandoffError> {
        let job_id = job.job_id();
        let latch = Arc::new(CompletionLatch::new());

        let (sink, rx) = ChannelSink::new();
        let ctx = Arc::new(ExecutionContext::with_clock(
            attempt_id,
            Arc::clone(&job),
            Arc::clone(&latch),
            Arc::new(sink),
            Arc::clone(&self.clock),
        ));

        let processing = tokio::task::spawn_blocking(move || {
            let running = latch.begin();
            let processing = consumer.process(ctx);
            match (running, &processing) {
                (Some(running), Processing::Async) => running.hand_off(),
                (Some(running), Processing::Done(_)) => running.settle(),
                (None, _) => {}
            }
            processing
        })
        .await
        .map_err(|e| {
            let err = HandoffError::ConsumerPanicked {
                job_id,
                message: e.to_string(),
            };
            error!(error = %err, "consumer did not return");
            err
        })?;

        let report = |state: TerminalState, path: CompletionPath| AttemptReport {
            job_id,
            attempt_id,
            state,
            path,
        };

        match processing {
            Processing::Done(result) => {
                let state = result.classify(job.is_stopped());
                info!(outcome = ?result.outcome, %state, "attempt finished");
                Ok(report(state, CompletionPath::Sync))
            }
            Processing::Async => {
                debug!("attempt continues asynchronously");
                let state = self.await_completion(job_id, rx).await?;
                info!(%state, "async attempt delivered");
                Ok(report(state, CompletionPath::Async))
            }
        }
    }

    async fn await_completion(
        &self,
        job_id: JobId,
        rx: oneshot::Receiver<TerminalState>,
    ) -> Result<TerminalState, HandoffError> {
        let received = match self.config.completion_timeout() {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => {
                    warn!(waited = ?limit, "gave up waiting for async completion");
                    return Err(HandoffError::CompletionTimedOut {
                        job_id,
                        waited: limit,
                    });
                }
            },
            None => rx.await,
        };

        received.map_err(|_| {
            warn!("async work dropped its context without finishing");
            HandoffError::CompletionDropped { job_id }
        })
    }
}

impl Default for AttemptRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}
