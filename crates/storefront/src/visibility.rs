//! Timed driver for the cart panel phases.
//!
//! Every input cancels whatever follow-up is pending before scheduling its
//! own, so a double toggle inside the open delay ends `Closed` without ever
//! passing through `Open`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tcgshop_core::visibility::{CartPhase, CartVisibilityState, Settle, Transition};
use tokio::sync::watch;

use crate::sync::lock;
use crate::timer::Timer;

/// Delay between mounting the panel and animating it in.
pub const DEFAULT_OPEN_DELAY: Duration = Duration::from_millis(10);
/// Length of the closing animation.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct Panel {
    phase: CartPhase,
    timer: Timer,
}

pub struct CartVisibility {
    panel: Arc<Mutex<Panel>>,
    tx: Arc<watch::Sender<CartPhase>>,
    open_delay: Duration,
    close_delay: Duration,
}

impl Default for CartVisibility {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_DELAY, DEFAULT_CLOSE_DELAY)
    }
}

impl CartVisibility {
    pub fn new(open_delay: Duration, close_delay: Duration) -> Self {
        let (tx, _) = watch::channel(CartPhase::Closed);
        Self {
            panel: Arc::default(),
            tx: Arc::new(tx),
            open_delay,
            close_delay,
        }
    }

    /// Open a closed panel; close an opening or open one. A toggle while
    /// closing leaves the pending close in place.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn toggle(&self) -> CartPhase {
        let mut panel = lock(&self.panel);
        match panel.phase.toggle() {
            Some(transition) => self.enter(&mut panel, transition),
            None => panel.phase,
        }
    }

    /// Close the panel if it is opening or open. Otherwise nothing happens.
    pub fn dismiss(&self) -> CartPhase {
        let mut panel = lock(&self.panel);
        match panel.phase.dismiss() {
            Some(transition) => self.enter(&mut panel, transition),
            None => panel.phase,
        }
    }

    pub fn phase(&self) -> CartPhase {
        lock(&self.panel).phase
    }

    pub fn state(&self) -> CartVisibilityState {
        self.phase().visibility()
    }

    pub fn subscribe(&self) -> watch::Receiver<CartPhase> {
        self.tx.subscribe()
    }

    /// Drop a pending follow-up, freezing the current phase.
    pub fn cancel_pending(&self) {
        lock(&self.panel).timer.cancel();
    }

    fn enter(&self, panel: &mut Panel, transition: Transition) -> CartPhase {
        let from = panel.phase;
        panel.phase = transition.now;
        self.tx.send_replace(transition.now);
        tracing::debug!(?from, to = ?transition.now, "Cart panel transition");

        let delay = match transition.settle {
            Settle::AfterOpenDelay => self.open_delay,
            Settle::AfterCloseDelay => self.close_delay,
        };

        let epoch = panel.timer.rearm();
        let shared = Arc::clone(&self.panel);
        let tx = Arc::clone(&self.tx);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut panel = lock(&shared);
            if panel.timer.fire(epoch) {
                let settled = panel.phase.settled();
                panel.phase = settled;
                tx.send_replace(settled);
                tracing::debug!(phase = ?settled, "Cart panel settled");
            }
        });
        panel.timer.arm(epoch, handle);

        transition.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn toggle_opens_after_open_delay() {
        let panel = CartVisibility::default();
        assert_eq!(panel.toggle(), CartPhase::Opening);
        assert!(panel.state().open);
        assert!(!panel.state().animating_in);

        tokio::time::sleep(DEFAULT_OPEN_DELAY + Duration::from_millis(1)).await;
        assert_eq!(panel.phase(), CartPhase::Open);
        assert!(panel.state().animating_in);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_when_closed_does_nothing() {
        let panel = CartVisibility::default();
        assert_eq!(panel.dismiss(), CartPhase::Closed);

        tokio::time::sleep(DEFAULT_CLOSE_DELAY * 2).await;
        assert_eq!(panel.phase(), CartPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pending_freezes_phase() {
        let panel = CartVisibility::default();
        panel.toggle();
        panel.cancel_pending();

        tokio::time::sleep(DEFAULT_CLOSE_DELAY).await;
        assert_eq!(panel.phase(), CartPhase::Opening);
    }
}
