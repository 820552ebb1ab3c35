//! Impls - port implementations for development and tests
//!
//! - `InMemoryJob`: JobHandle that keeps properties in memory
//! - `ChannelSink`: CompletionSink that hands the state over a oneshot channel

pub mod channel_sink;
pub mod memory_job;

pub use self::channel_sink::ChannelSink;
pub use self::memory_job::{InMemoryJob, JobProperties, StopSignal};
