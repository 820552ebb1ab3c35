//! One-shot latch for "this job finished asynchronously".
//!
//! Replaces a shared boolean plus an external lock with a single phase atomic:
//!
//! ```text
//! Idle --begin--> Running --hand_off--> Armed --try_complete--> Completed
//!   ^                |
//!   +----settle------+
//! ```
//!
//! `Running` covers the time `process` is on the worker thread. Completion
//! calls from other threads park until the worker leaves it; a call from the
//! worker thread itself is refused, since the attempt has not gone async.
//! `Completed` is absorbing. Exactly one caller can move a latch from `Armed`
//! to `Completed`; everyone else is told why they lost.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const ARMED: u8 = 2;
const COMPLETED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchPhase {
    /// The attempt has not declared itself asynchronous.
    Idle,
    /// `process` is still on the worker thread.
    Running,
    /// Async work in flight, not yet finished.
    Armed,
    Completed,
}

/// Why a completion attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    NotArmed,
    AlreadyCompleted,
}

#[derive(Debug)]
pub struct CompletionLatch {
    phase: AtomicU8,
    /// Worker thread while `Running`. Also the mutex parked completers wait on.
    worker: Mutex<Option<ThreadId>>,
    left_running: Condvar,
}

/// Held by the worker thread while `process` runs.
///
/// Dropping it without [`hand_off`](Running::hand_off) settles the attempt as
/// synchronous, which also covers a panicking `process`.
#[must_use = "dropping the guard settles the attempt as synchronous"]
#[derive(Debug)]
pub struct Running<'a> {
    latch: &'a CompletionLatch,
}

impl Running<'_> {
    /// Running -> Armed. The work will call `finish_async` later.
    pub fn hand_off(self) {
        self.latch.leave_running(ARMED);
    }

    /// Running -> Idle. The work returned its result directly.
    pub fn settle(self) {}
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        // No-op after hand_off: the phase is no longer Running.
        self.latch.leave_running(IDLE);
    }
}

impl CompletionLatch {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(IDLE),
            worker: Mutex::new(None),
            left_running: Condvar::new(),
        }
    }

    /// Idle -> Running, recording the calling thread as the worker.
    /// `None` if the latch was not idle.
    pub fn begin(&self) -> Option<Running<'_>> {
        let mut worker = self.lock_worker();
        self.transition(IDLE, RUNNING).ok()?;
        *worker = Some(thread::current().id());
        Some(Running { latch: self })
    }

    /// Idle -> Armed, skipping the worker phase.
    pub fn arm(&self) -> bool {
        self.transition(IDLE, ARMED).is_ok()
    }

    /// Armed -> Completed. True for exactly one caller per armed latch.
    pub fn try_complete(&self) -> bool {
        self.complete_with(|| ()).is_ok()
    }

    /// Complete the latch and, only if this call won, run `f`.
    ///
    /// While the latch is `Running` this blocks, unless it is called from the
    /// worker thread, which gets `NotArmed` straight away. `f` runs after the
    /// transition is published, on the winning thread, with no lock held.
    pub fn complete_with<R>(&self, f: impl FnOnce() -> R) -> Result<R, Rejected> {
        if self.phase.load(Ordering::Acquire) == RUNNING {
            self.wait_for_worker()?;
        }
        match self.transition(ARMED, COMPLETED) {
            Ok(()) => Ok(f()),
            Err(COMPLETED) => Err(Rejected::AlreadyCompleted),
            Err(_) => Err(Rejected::NotArmed),
        }
    }

    pub fn phase(&self) -> LatchPhase {
        match self.phase.load(Ordering::Acquire) {
            IDLE => LatchPhase::Idle,
            RUNNING => LatchPhase::Running,
            ARMED => LatchPhase::Armed,
            _ => LatchPhase::Completed,
        }
    }

    fn wait_for_worker(&self) -> Result<(), Rejected> {
        let me = thread::current().id();
        let mut worker = self.lock_worker();
        while self.phase.load(Ordering::Acquire) == RUNNING {
            if *worker == Some(me) {
                return Err(Rejected::NotArmed);
            }
            worker = self
                .left_running
                .wait(worker)
                .unwrap_or_else(PoisonError::into_inner);
        }
        Ok(())
    }

    fn leave_running(&self, to: u8) {
        let mut worker = self.lock_worker();
        if self.transition(RUNNING, to).is_ok() {
            *worker = None;
            self.left_running.notify_all();
        }
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, from: u8, to: u8) -> Result<(), u8> {
        self.phase
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
    }
}

impl Default for CompletionLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Barrier, mpsc};
    use std::time::Duration;

    #[test]
    fn idle_latch_refuses_completion() {
        let latch = CompletionLatch::new();

        assert!(!latch.try_complete());
        assert_eq!(latch.complete_with(|| ()), Err(Rejected::NotArmed));
        assert_eq!(latch.phase(), LatchPhase::Idle);
    }

    #[test]
    fn completes_once() {
        let latch = CompletionLatch::new();
        assert!(latch.arm());

        assert_eq!(latch.complete_with(|| 7), Ok(7));
        assert_eq!(latch.complete_with(|| 8), Err(Rejected::AlreadyCompleted));
        assert!(!latch.try_complete());
        assert_eq!(latch.phase(), LatchPhase::Completed);
    }

    #[test]
    fn completed_latch_cannot_be_restarted() {
        let latch = CompletionLatch::new();
        latch.arm();
        latch.try_complete();

        assert!(!latch.arm());
        assert!(latch.begin().is_none());
        assert_eq!(latch.phase(), LatchPhase::Completed);
    }

    #[test]
    fn worker_thread_cannot_complete_while_running() {
        let latch = CompletionLatch::new();
        let running = latch.begin().unwrap();

        assert_eq!(latch.complete_with(|| ()), Err(Rejected::NotArmed));
        assert_eq!(latch.phase(), LatchPhase::Running);

        running.settle();
        assert_eq!(latch.phase(), LatchPhase::Idle);
        assert!(!latch.try_complete());
    }

    #[test]
    fn dropped_guard_settles_as_sync() {
        let latch = CompletionLatch::new();
        drop(latch.begin());

        assert_eq!(latch.phase(), LatchPhase::Idle);
    }

    #[test]
    fn hand_off_arms() {
        let latch = CompletionLatch::new();
        latch.begin().unwrap().hand_off();

        assert_eq!(latch.phase(), LatchPhase::Armed);
        assert!(latch.try_complete());
    }

    #[test]
    fn other_thread_waits_for_hand_off() {
        let latch = Arc::new(CompletionLatch::new());
        let running = latch.begin().unwrap();
        let (tx, rx) = mpsc::channel();

        let completer = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                let won = latch.complete_with(|| ()).is_ok();
                let _ = tx.send(won);
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(30)).is_err());
        running.hand_off();

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)), Ok(true));
        completer.join().unwrap();
        assert_eq!(latch.phase(), LatchPhase::Completed);
    }

    #[test]
    fn other_thread_is_refused_after_settle() {
        let latch = Arc::new(CompletionLatch::new());
        let running = latch.begin().unwrap();

        let completer = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || latch.complete_with(|| ()))
        };
        thread::sleep(Duration::from_millis(20));
        running.settle();

        assert_eq!(completer.join().unwrap(), Err(Rejected::NotArmed));
        assert_eq!(latch.phase(), LatchPhase::Idle);
    }

    #[test]
    fn racing_completers_have_one_winner() {
        const THREADS: usize = 8;

        for _ in 0..50 {
            let latch = Arc::new(CompletionLatch::new());
            latch.arm();
            let barrier = Arc::new(Barrier::new(THREADS));
            let callbacks = Arc::new(AtomicUsize::new(0));

            let joins: Vec<_> = (0..THREADS)
                .map(|_| {
                    let latch = Arc::clone(&latch);
                    let barrier = Arc::clone(&barrier);
                    let callbacks = Arc::clone(&callbacks);
                    thread::spawn(move || {
                        barrier.wait();
                        latch
                            .complete_with(|| callbacks.fetch_add(1, Ordering::SeqCst))
                            .is_ok()
                    })
                })
                .collect();

            let winners = joins
                .into_iter()
                .map(|j| j.join().unwrap())
                .filter(|won| *won)
                .count();
            assert_eq!(winners, 1);
            assert_eq!(callbacks.load(Ordering::SeqCst), 1);
        }
    }
}
