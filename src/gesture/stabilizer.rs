//! Hold-confirmation state machine over smoothed gesture verdicts
//!
//! Window voting rejects single-frame misclassification; the hold timer on
//! top of it rejects momentary poses. Only a gesture that stays stable for
//! the full hold time produces an event, and each emission clears the
//! window so the next trigger must accumulate a fresh majority.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::events::ActionEvent;

use super::window::StabilityWindow;

/// Hold-tracking phase. `Holding` is entered when the window first becomes
/// stable and carries the time that happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Holding { since: Instant },
}

/// Turns raw per-frame verdicts into at most one confirmed event per hold.
pub struct GestureStabilizer {
    window: StabilityWindow,
    hold_time: Duration,
    phase: Phase,
}

impl GestureStabilizer {
    pub fn new(window_frames: usize, hold_time: Duration) -> Self {
        Self {
            window: StabilityWindow::new(window_frames),
            hold_time,
            phase: Phase::Idle,
        }
    }

    /// Feed one frame verdict. `now` is passed in so hold timing is driven
    /// by the caller's clock.
    pub fn observe(&mut self, signal: bool, now: Instant) -> Option<ActionEvent> {
        self.window.push(signal);
        let stable = self.window.is_stable();

        match (self.phase, stable) {
            (Phase::Idle, true) => {
                debug!(votes = self.window.votes(), "gesture stable, hold started");
                self.phase = Phase::Holding { since: now };
                None
            }
            (Phase::Holding { since }, true) => {
                if now.duration_since(since) >= self.hold_time {
                    self.phase = Phase::Idle;
                    // The next trigger must build a fresh majority from an
                    // empty window; residual frames must not re-fire.
                    self.window.clear();
                    Some(ActionEvent::gesture())
                } else {
                    None
                }
            }
            (Phase::Holding { .. }, false) => {
                debug!("gesture lost before hold completed");
                self.phase = Phase::Idle;
                None
            }
            (Phase::Idle, false) => None,
        }
    }

    /// Whether a stable gesture is currently being held.
    pub fn is_holding(&self) -> bool {
        matches!(self.phase, Phase::Holding { .. })
    }
}
