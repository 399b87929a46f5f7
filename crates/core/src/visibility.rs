//! Cart panel visibility phases.
//!
//! The panel moves `Closed -> Opening -> Open -> Closing -> Closed`. The
//! intermediate phases exist so the rendering surface can mount the panel
//! before animating it in and keep it mounted while animating out. The
//! timers that advance `Opening` and `Closing` live with the caller; this
//! module only says where each input leads.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CartPhase {
    #[default]
    Closed,
    /// Mounted, waiting for layout to settle before animating in.
    Opening,
    Open,
    /// Animating out, still mounted.
    Closing,
}

/// What the rendering surface needs: whether to mount the panel and
/// whether it is in its animated-in position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartVisibilityState {
    pub open: bool,
    pub animating_in: bool,
}

/// Which delayed follow-up a transition needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Advance `Opening` to `Open` after the open delay.
    AfterOpenDelay,
    /// Advance `Closing` to `Closed` after the close delay.
    AfterCloseDelay,
}

/// Result of applying an input: the phase to enter now, and the follow-up
/// to schedule (replacing any pending one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub now: CartPhase,
    pub settle: Settle,
}

impl CartPhase {
    pub fn visibility(self) -> CartVisibilityState {
        match self {
            CartPhase::Closed => CartVisibilityState {
                open: false,
                animating_in: false,
            },
            CartPhase::Opening | CartPhase::Closing => CartVisibilityState {
                open: true,
                animating_in: false,
            },
            CartPhase::Open => CartVisibilityState {
                open: true,
                animating_in: true,
            },
        }
    }

    /// The toggle input. `None` while closing: the pending close stands
    /// and the panel still ends `Closed`.
    pub fn toggle(self) -> Option<Transition> {
        match self {
            CartPhase::Closed => Some(Transition {
                now: CartPhase::Opening,
                settle: Settle::AfterOpenDelay,
            }),
            CartPhase::Opening | CartPhase::Open => Some(Transition {
                now: CartPhase::Closing,
                settle: Settle::AfterCloseDelay,
            }),
            CartPhase::Closing => None,
        }
    }

    /// The escape/cancel input: a toggle while opening or open, otherwise
    /// nothing.
    pub fn dismiss(self) -> Option<Transition> {
        match self {
            CartPhase::Opening | CartPhase::Open => self.toggle(),
            CartPhase::Closed | CartPhase::Closing => None,
        }
    }

    /// The phase a pending follow-up settles into.
    pub fn settled(self) -> CartPhase {
        match self {
            CartPhase::Opening => CartPhase::Open,
            CartPhase::Closing => CartPhase::Closed,
            other => other,
        }
    }
}
