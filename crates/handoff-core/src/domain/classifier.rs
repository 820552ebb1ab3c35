//! Outcome -> TerminalState mapping.

use super::outcome::Outcome;
use super::state::TerminalState;

/// Map a raw outcome and the stop flag to the state the queue acts on.
///
/// | outcome   | stop requested | state            |
/// |-----------|----------------|------------------|
/// | Succeeded | any            | Succeeded        |
/// | Failed    | any            | QueuedForRetry   |
/// | Cancelled | true           | Stopped          |
/// | Cancelled | false          | Error            |
///
/// Retry limits are the queue's business; a failure is always `QueuedForRetry`
/// here.
pub fn classify(outcome: Outcome, stop_requested: bool) -> TerminalState {
    match (outcome, stop_requested) {
        (Outcome::Succeeded, _) => TerminalState::Succeeded,
        (Outcome::Failed, _) => TerminalState::QueuedForRetry,
        (Outcome::Cancelled, true) => TerminalState::Stopped,
        (Outcome::Cancelled, false) => TerminalState::Error,
    }
}
