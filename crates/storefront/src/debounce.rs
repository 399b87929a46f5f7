//! Trailing-edge debounce over a watch channel.
//!
//! [`Debouncer::push`] replaces the pending value and restarts the quiet
//! period. Subscribers see a value only once no newer push has arrived for
//! the whole quiet period; intermediate values are dropped, never queued.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;

use crate::sync::lock;
use crate::timer::Timer;

pub struct Debouncer<T> {
    quiet: Duration,
    timer: Arc<Mutex<Timer>>,
    tx: Arc<watch::Sender<T>>,
}

impl<T> Debouncer<T>
where
    T: Send + Sync + 'static,
{
    /// Create a debouncer whose settled value starts as `initial`.
    pub fn new(quiet: Duration, initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            quiet,
            timer: Arc::new(Mutex::new(Timer::default())),
            tx: Arc::new(tx),
        }
    }

    /// Supersede any pending value with `value` and restart the quiet period.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn push(&self, value: T) {
        let mut timer = lock(&self.timer);
        let epoch = timer.rearm();

        let shared = Arc::clone(&self.timer);
        let tx = Arc::clone(&self.tx);
        let quiet = self.quiet;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let mut timer = lock(&shared);
            if timer.fire(epoch) {
                tx.send_replace(value);
            }
        });
        timer.arm(epoch, handle);
    }

    /// Drop the pending value, if any.
    pub fn cancel(&self) {
        lock(&self.timer).cancel();
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.timer).is_pending()
    }

    /// Receive settled values. The current value counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The most recently settled value.
    pub fn settled(&self) -> T {
        self.tx.borrow().clone()
    }
}
