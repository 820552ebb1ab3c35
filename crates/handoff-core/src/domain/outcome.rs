//! Outcome model: what a unit of work reports when it finishes.
//!
//! The outcome is the raw, unclassified result. The queue never sees it
//! directly; it only sees the [`TerminalState`] derived from it together with
//! the stop flag (see [`classify`](super::classify)).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::TerminalState;
use super::classifier::classify;

/// How a unit of work ended.
///
/// Closed on purpose: every consumer of this enum matches it exhaustively, so
/// there is no "unknown outcome" to fall through to a default state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Succeeded,
    Failed,
    Cancelled,
}

/// Immutable description of a finished attempt.
///
/// Used by both completion paths: returned from
/// [`JobConsumer::process`](crate::app::JobConsumer::process) on the
/// synchronous path, or passed to
/// [`ExecutionContext::finish_async`](crate::context::ExecutionContext::finish_async).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub outcome: Outcome,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Delay the work would like before the next attempt. Only meaningful for
    /// failures; the dispatcher is free to ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "millis")]
    pub retry_delay: Option<Duration>,
}

impl ExecutionResult {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            message: None,
            retry_delay: None,
        }
    }

    pub fn succeeded() -> Self {
        Self::new(Outcome::Succeeded)
    }

    pub fn failed() -> Self {
        Self::new(Outcome::Failed)
    }

    pub fn cancelled() -> Self {
        Self::new(Outcome::Cancelled)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a retry hint. Ignored unless the outcome is `Failed`.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        if self.outcome == Outcome::Failed {
            self.retry_delay = Some(delay);
        }
        self
    }

    /// Queue-facing state for this result given the stop flag at finish time.
    pub fn classify(&self, stop_requested: bool) -> TerminalState {
        classify(self.outcome, stop_requested)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
