//! ChannelSink - CompletionSink backed by a tokio oneshot channel.

use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;
use tracing::warn;

use crate::domain::{JobId, TerminalState};
use crate::ports::CompletionSink;

/// Forwards the single terminal state of an attempt to whoever holds the
/// receiver.
///
/// Dropping every clone of the sink without delivering closes the receiver,
/// which is how the dispatcher learns that async work was abandoned.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Mutex<Option<oneshot::Sender<TerminalState>>>,
}

impl ChannelSink {
    pub fn new() -> (Self, oneshot::Receiver<TerminalState>) {
        let (tx, rx) = oneshot::channel();
        let sink = Self {
            tx: Mutex::new(Some(tx)),
        };
        (sink, rx)
    }
}

impl CompletionSink for ChannelSink {
    fn finished(&self, job_id: JobId, state: TerminalState) {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        match tx {
            Some(tx) => {
                if tx.send(state).is_err() {
                    warn!(%job_id, %state, "dispatcher stopped listening before completion");
                }
            }
            None => warn!(%job_id, %state, "completion already delivered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_first_state_only() {
        let (sink, rx) = ChannelSink::new();
        let job_id = JobId::generate();

        sink.finished(job_id, TerminalState::Stopped);
        sink.finished(job_id, TerminalState::Succeeded);

        assert_eq!(rx.await.unwrap(), TerminalState::Stopped);
    }

    #[tokio::test]
    async fn dropping_sink_closes_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(sink);

        assert!(rx.await.is_err());
    }
}
