//! Lock delay state machine
//!
//! A piece that touches supporting terrain gets a grace period before it
//! fuses to the board. The timer is an explicit tagged state instead of a
//! sentinel timestamp, so an `Instant` of any value is unambiguous.
//!
//! Moves and rotations that keep the piece grounded restart the timer. There
//! is no reset cap.

use std::time::{Duration, Instant};

/// Where the lock timer stands for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    #[default]
    Airborne,
    Grounded { since: Instant },
}

#[derive(Debug, Clone)]
pub struct LockController {
    state: LockState,
    delay: Duration,
}

impl LockController {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: LockState::Airborne,
            delay,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Discard the timer (new piece, hold swap).
    pub fn reset(&mut self) {
        self.state = LockState::Airborne;
    }

    /// A move or rotation was committed. Restart the timer if the piece is
    /// still resting on something, otherwise drop it.
    pub fn on_moved(&mut self, grounded: bool, now: Instant) {
        self.state = if grounded {
            LockState::Grounded { since: now }
        } else {
            LockState::Airborne
        };
    }

    /// Start the timer if it is not already running. An existing timer keeps
    /// its original start.
    pub fn ensure_started(&mut self, now: Instant) {
        if self.state == LockState::Airborne {
            self.state = LockState::Grounded { since: now };
        }
    }

    /// Evaluate once per tick. Returns `true` when the piece must lock.
    pub fn update(&mut self, grounded: bool, now: Instant) -> bool {
        if !grounded {
            self.state = LockState::Airborne;
            return false;
        }

        self.ensure_started(now);
        self.elapsed(now)
            .map(|elapsed| elapsed >= self.delay)
            .unwrap_or(false)
    }

    /// Time spent grounded, or `None` while airborne.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        match self.state {
            LockState::Airborne => None,
            LockState::Grounded { since } => Some(now.saturating_duration_since(since)),
        }
    }

    /// Move the timer start forward, used to freeze it across a pause.
    pub fn shift(&mut self, by: Duration) {
        if let LockState::Grounded { since } = self.state {
            self.state = LockState::Grounded { since: since + by };
        }
    }
}
