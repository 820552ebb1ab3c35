//! Queue-facing job states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The only vocabulary the surrounding queue understands when an attempt ends.
///
/// Never stored on its own; always derived from an
/// [`Outcome`](super::Outcome) and the stop flag.
///
/// State transitions seen by the queue:
/// - Running -> Succeeded
/// - Running -> QueuedForRetry -> (next attempt)
/// - Running -> Stopped
/// - Running -> Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalState {
    Succeeded,

    /// The attempt failed; the queue decides whether another attempt runs.
    QueuedForRetry,

    /// Cancelled without an outstanding stop request.
    Error,

    /// Cancelled because a stop was requested.
    Stopped,
}

impl TerminalState {
    /// Does this state end the job (no further attempts from this state)?
    pub fn is_final(self) -> bool {
        !matches!(self, TerminalState::QueuedForRetry)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TerminalState::Succeeded => "SUCCEEDED",
            TerminalState::QueuedForRetry => "QUEUED_FOR_RETRY",
            TerminalState::Error => "ERROR",
            TerminalState::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
