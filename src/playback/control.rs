//! Cooperative pause/cancel primitives for the playback worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Pause gate plus cancellation flag, sharing one condvar so `cancel`
/// wakes a worker that is either paused or mid-sleep.
///
/// A fresh control is created for every playback run; cancellation is
/// one-way and never reset.
pub(crate) struct PlaybackControl {
    cancelled: AtomicBool,
    paused: Mutex<bool>,
    condvar: Condvar,
}

impl PlaybackControl {
    pub(crate) fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            paused: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // Release anything blocked on the gate or sleeping.
        let _guard = self.paused.lock();
        self.condvar.notify_all();
    }

    pub(crate) fn pause(&self) {
        *self.paused.lock() = true;
    }

    pub(crate) fn resume(&self) {
        *self.paused.lock() = false;
        self.condvar.notify_all();
    }

    /// Block while the gate is closed. Returns `false` when the wait was
    /// ended by cancellation rather than `resume`.
    pub(crate) fn wait_while_paused(&self) -> bool {
        let mut paused = self.paused.lock();
        while *paused && !self.is_cancelled() {
            self.condvar.wait(&mut paused);
        }
        !self.is_cancelled()
    }

    /// Interruptible sleep. Returns `false` when cancelled before the
    /// full duration elapsed.
    pub(crate) fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut guard = self.paused.lock();
        loop {
            if self.is_cancelled() {
                return false;
            }
            if Instant::now() >= deadline {
                return true;
            }
            self.condvar.wait_until(&mut guard, deadline);
        }
    }
}
