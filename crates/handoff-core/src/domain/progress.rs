//! Progress and log records handed to the job's persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress of one attempt.
///
/// Nothing but `started` is meaningful until `started` is true, and `started`
/// never goes back to false within an attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub started: bool,
    pub steps_done: u64,
    pub steps_total: u64,
    /// Estimated completion time, epoch milliseconds.
    pub eta_epoch_millis: i64,
}

impl ProgressState {
    /// Percentage of completed steps, `None` before start or without a total.
    pub fn percent_done(&self) -> Option<f64> {
        if !self.started || self.steps_total == 0 {
            return None;
        }
        let ratio = self.steps_done as f64 / self.steps_total as f64;
        Some((ratio * 100.0).min(100.0))
    }

    pub fn remaining_steps(&self) -> u64 {
        self.steps_total.saturating_sub(self.steps_done)
    }
}

/// One `log(message, args...)` call from the unit of work.
///
/// Arguments are kept unformatted; rendering `args` into `message` is left to
/// whoever stores the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,

    pub logged_at: DateTime<Utc>,
}

/// A change to the job's persisted properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyUpdate {
    Progress(ProgressState),
    Log(LogEntry),
}
