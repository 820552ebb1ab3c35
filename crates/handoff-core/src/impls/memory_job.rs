//! InMemoryJob - a JobHandle for development and tests
//!
//! Keeps the job's persisted properties in memory and owns the stop flag on
//! behalf of the dispatcher.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::domain::{JobId, LogEntry, ProgressState, PropertyUpdate};
use crate::ports::JobHandle;

/// Dispatcher-owned cooperative stop flag.
///
/// Cloning shares the flag; the dispatcher keeps one clone to request a stop,
/// the job handle keeps another to answer `is_stopped`.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What has been persisted for the job so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobProperties {
    pub progress: ProgressState,
    pub log: Vec<LogEntry>,
    /// Number of `persist` calls received.
    pub writes: usize,
}

#[derive(Debug)]
pub struct InMemoryJob {
    job_id: JobId,
    stop: StopSignal,
    properties: Mutex<JobProperties>,
}

impl InMemoryJob {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            stop: StopSignal::new(),
            properties: Mutex::new(JobProperties::default()),
        }
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn properties(&self) -> JobProperties {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, JobProperties> {
        self.properties.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobHandle for InMemoryJob {
    fn job_id(&self) -> JobId {
        self.job_id
    }

    fn persist(&self, update: PropertyUpdate) {
        let mut props = self.lock();
        props.writes += 1;
        match update {
            PropertyUpdate::Progress(progress) => props.progress = progress,
            PropertyUpdate::Log(entry) => props.log.push(entry),
        }
    }

    fn is_stopped(&self) -> bool {
        self.stop.is_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn stop_signal_is_shared_between_clones() {
        let job = InMemoryJob::new(JobId::generate());
        let dispatcher_side = job.stop_signal();

        assert!(!job.is_stopped());
        dispatcher_side.request();
        assert!(job.is_stopped());
    }

    #[test]
    fn persist_keeps_latest_progress_and_all_logs() {
        let job = InMemoryJob::new(JobId::generate());
        let progress = ProgressState {
            started: true,
            steps_done: 2,
            steps_total: 5,
            eta_epoch_millis: 42,
        };

        job.persist(PropertyUpdate::Progress(ProgressState::default()));
        job.persist(PropertyUpdate::Progress(progress));
        job.persist(PropertyUpdate::Log(LogEntry {
            message: "hello".into(),
            args: vec![],
            logged_at: Utc::now(),
        }));

        let props = job.properties();
        assert_eq!(props.progress, progress);
        assert_eq!(props.log.len(), 1);
        assert_eq!(props.writes, 3);
    }
}
