//! App - the application layer
//!
//! Reference dispatcher for a single attempt, wired from the context and the
//! in-memory impls.
//!
//! # Components
//! - **JobConsumer**: the unit of work (sync result or async handoff)
//! - **AttemptRunner**: runs one attempt and resolves its terminal state
//! - **RunnerConfig**: runner settings

pub mod config;
pub mod consumer;
pub mod runner;

pub use self::config::RunnerConfig;
pub use self::consumer::{JobConsumer, Processing};
pub use self::runner::{AttemptReport, AttemptRunner, CompletionPath};
