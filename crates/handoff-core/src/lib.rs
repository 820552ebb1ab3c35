//! handoff-core
//!
//! Execution handoff between a job queue and the unit of work it runs: progress
//! reporting, cooperative stop checks, and exactly-once async completion.
//!
//! # Modules
//! - **domain**: ids, outcome, classifier, terminal state, progress records, errors
//! - **ports**: JobHandle, CompletionSink, Clock
//! - **context**: progress tracker, completion latch, ExecutionContext
//! - **impls**: InMemoryJob, ChannelSink
//! - **app**: JobConsumer, AttemptRunner

pub mod app;
pub mod context;
pub mod domain;
pub mod impls;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AttemptReport, AttemptRunner, CompletionPath, JobConsumer, Processing, RunnerConfig};
pub use context::{CompletionLatch, ExecutionContext};
pub use domain::{ExecutionResult, HandoffError, JobId, Outcome, TerminalState, classify};
