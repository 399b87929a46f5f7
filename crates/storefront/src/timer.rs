//! Cancellable one-shot delays guarding a piece of shared state.
//!
//! A [`Timer`] lives inside the mutex-protected state it advances. Arming
//! it cancels whatever was pending and opens a new epoch; the spawned
//! callback re-locks the state and only acts if its epoch is still the
//! current one. Aborting the task alone is not enough: a callback that has
//! already woken may be blocked on the lock while the re-entrant call that
//! superseded it runs.

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub(crate) struct Timer {
    epoch: u64,
    pending: Option<JoinHandle<()>>,
}

impl Timer {
    /// Cancel any pending callback and return the epoch for the next one.
    pub(crate) fn rearm(&mut self) -> u64 {
        self.cancel();
        self.epoch
    }

    /// Record the task scheduled for `epoch`.
    pub(crate) fn arm(&mut self, epoch: u64, handle: JoinHandle<()>) {
        if epoch == self.epoch {
            self.pending = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Called by the callback once it holds the lock. Returns `true` iff the
    /// callback's epoch is still current, consuming the pending slot.
    pub(crate) fn fire(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.pending = None;
        true
    }

    /// Cancel any pending callback without scheduling a new one.
    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stale_epoch_does_not_fire() {
        let mut timer = Timer::default();
        let first = timer.rearm();
        timer.arm(first, tokio::spawn(async {}));
        let second = timer.rearm();

        assert!(!timer.fire(first));
        assert!(!timer.is_pending());
        timer.arm(second, tokio::spawn(async {}));
        assert!(timer.is_pending());
        assert!(timer.fire(second));
        assert!(!timer.is_pending());
    }

    #[tokio::test]
    async fn cancel_invalidates_current_epoch() {
        let mut timer = Timer::default();
        let epoch = timer.rearm();
        timer.arm(epoch, tokio::spawn(async {}));
        timer.cancel();

        assert!(!timer.is_pending());
        assert!(!timer.fire(epoch));
    }
}
