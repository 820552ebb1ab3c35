use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for [`AttemptRunner`](super::AttemptRunner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Name recorded on the attempt span.
    pub consumer_name: String,

    /// Give up waiting for an async completion after this long.
    /// `None` waits until the work finishes or drops its context.
    pub completion_timeout_ms: Option<u64>,
}

impl RunnerConfig {
    pub fn completion_timeout(&self) -> Option<Duration> {
        self.completion_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            consumer_name: "default".to_string(),
            completion_timeout_ms: None,
        }
    }
}
