//! Domain model (ids, outcomes, classification, terminal states, progress, errors).

pub mod classifier;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod progress;
pub mod state;

pub use classifier::classify;
pub use errors::HandoffError;
pub use ids::{AttemptId, JobId};
pub use outcome::{ExecutionResult, Outcome};
pub use progress::{LogEntry, ProgressState, PropertyUpdate};
pub use state::TerminalState;
