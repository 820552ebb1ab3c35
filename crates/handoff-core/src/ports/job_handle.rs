//! JobHandle port - the job as seen from inside one attempt.

use crate::domain::{JobId, PropertyUpdate};

/// Access to the job an attempt is working on.
///
/// Implementations own persistence and the stop flag. `persist` is called
/// synchronously from the worker thread and must not fail from the caller's
/// point of view; storage errors are the implementation's to handle.
pub trait JobHandle: Send + Sync {
    /// Stable identifier, used in error messages and spans.
    fn job_id(&self) -> JobId;

    fn persist(&self, update: PropertyUpdate);

    /// Has the dispatcher asked this job to stop? Must be a plain read.
    fn is_stopped(&self) -> bool;
}
