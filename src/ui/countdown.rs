//! Return-to-idle countdown, counted in ticks.
//!
//! Any interaction with a browse view restarts it; editing disables it.

use crate::config::HOLD_TICKS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleCountdown {
    remaining: u8,
    hold: u8,
}

impl IdleCountdown {
    /// A stopped countdown that restarts at [`HOLD_TICKS`].
    pub const fn new() -> Self {
        Self::with_hold(HOLD_TICKS)
    }

    pub const fn with_hold(hold: u8) -> Self {
        Self { remaining: 0, hold }
    }

    /// Record activity: back to the full hold.
    pub fn reset(&mut self) {
        self.remaining = self.hold;
    }

    pub fn disable(&mut self) {
        self.remaining = 0;
    }

    pub const fn is_running(&self) -> bool {
        self.remaining > 0
    }

    pub const fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Count one tick. Returns `true` on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

impl Default for IdleCountdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped() {
        let mut countdown = IdleCountdown::new();
        assert!(!countdown.is_running());
        assert!(!countdown.tick());
    }

    #[test]
    fn expires_on_the_hold_tick() {
        let mut countdown = IdleCountdown::new();
        countdown.reset();
        for _ in 1..HOLD_TICKS {
            assert!(!countdown.tick());
        }
        assert!(countdown.tick());
        assert!(!countdown.is_running());
        // Stays expired.
        assert!(!countdown.tick());
    }

    #[test]
    fn reset_restarts_the_hold() {
        let mut countdown = IdleCountdown::with_hold(3);
        countdown.reset();
        countdown.tick();
        countdown.tick();
        countdown.reset();
        assert_eq!(countdown.remaining(), 3);
    }

    #[test]
    fn disable_stops_counting() {
        let mut countdown = IdleCountdown::new();
        countdown.reset();
        countdown.disable();
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 0);
    }
}
