//! Per-attempt execution handoff: progress, stop query and async completion.

pub mod execution;
pub mod latch;
pub mod progress;

pub use self::execution::ExecutionContext;
pub use self::latch::{CompletionLatch, LatchPhase, Rejected, Running};
pub use self::progress::ProgressTracker;
