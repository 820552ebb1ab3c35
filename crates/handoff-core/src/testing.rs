//! Recording test doubles for the ports.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{JobId, ProgressState, PropertyUpdate, TerminalState};
use crate::ports::{CompletionSink, JobHandle};

pub(crate) struct RecordingHandle {
    job_id: JobId,
    stopped: AtomicBool,
    updates: Mutex<Vec<PropertyUpdate>>,
}

impl RecordingHandle {
    pub(crate) fn new() -> Self {
        Self {
            job_id: JobId::generate(),
            stopped: AtomicBool::new(false),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_stopped(&self, stopped: bool) {
        self.stopped.store(stopped, Ordering::SeqCst);
    }

    pub(crate) fn updates(&self) -> Vec<PropertyUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn progress_updates(&self) -> Vec<ProgressState> {
        self.updates()
            .into_iter()
            .filter_map(|u| match u {
                PropertyUpdate::Progress(p) => Some(p),
                PropertyUpdate::Log(_) => None,
            })
            .collect()
    }
}

impl JobHandle for RecordingHandle {
    fn job_id(&self) -> JobId {
        self.job_id
    }

    fn persist(&self, update: PropertyUpdate) {
        self.updates.lock().unwrap().push(update);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    deliveries: Mutex<Vec<(JobId, TerminalState)>>,
}

impl RecordingSink {
    pub(crate) fn deliveries(&self) -> Vec<(JobId, TerminalState)> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl CompletionSink for RecordingSink {
    fn finished(&self, job_id: JobId, state: TerminalState) {
        self.deliveries.lock().unwrap().push((job_id, state));
    }
}
