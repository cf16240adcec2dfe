use serde::{Deserialize, Serialize};

/// Valid transitions:
/// - Idle -> Running
/// - Running -> Expired
/// - Running -> Stopped
/// - any -> Idle (reset)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    /// Waiting for the first reveal of the stage
    Idle,
    /// Counting down once per tick
    Running,
    /// Ran out of time
    Expired,
    /// Cancelled because the stage ended some other way
    Stopped,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running, nothing happened
    Ignored,
    /// One unit elapsed, carries the remaining time
    Ticked(u32),
    /// Remaining time reached zero on this tick
    Expired,
}

/// Countdown clock that grants bonus time on successful reveals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    state: TimerState,
    remaining: u32,
}

impl Countdown {
    pub const fn new(initial: u32) -> Self {
        Self {
            state: TimerState::Idle,
            remaining: initial,
        }
    }

    pub const fn state(&self) -> TimerState {
        self.state
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    /// Starts counting down, only from `Idle`. Returns whether the timer started.
    pub fn start(&mut self) -> bool {
        if matches!(self.state, TimerState::Idle) {
            log::debug!("timer started with {} left", self.remaining);
            self.state = TimerState::Running;
            true
        } else {
            false
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            log::debug!("timer expired");
            self.state = TimerState::Expired;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked(self.remaining)
        }
    }

    /// Extends a running countdown, the tick schedule is left untouched.
    pub fn add_bonus(&mut self, amount: u32) {
        if self.is_running() {
            self.remaining = self.remaining.saturating_add(amount);
        }
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            self.state = TimerState::Stopped;
        }
    }

    pub fn reset(&mut self, initial: u32) {
        *self = Self::new(initial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_ignores_ticks() {
        let mut timer = Countdown::new(10);

        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert_eq!(timer.remaining(), 10);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn bonus_extends_running_countdown() {
        let mut timer = Countdown::new(10);
        assert!(timer.start());

        for _ in 0..3 {
            timer.add_bonus(10);
            assert!(matches!(timer.tick(), TickOutcome::Ticked(_)));
        }

        assert_eq!(timer.remaining(), 10 + 3 * 10 - 3);
    }

    #[test]
    fn expires_when_reaching_zero() {
        let mut timer = Countdown::new(1);
        timer.start();

        assert_eq!(timer.tick(), TickOutcome::Expired);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.tick(), TickOutcome::Ignored);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn stopped_timer_stays_stopped() {
        let mut timer = Countdown::new(10);
        timer.start();
        timer.stop();

        assert!(!timer.start());
        assert_eq!(timer.tick(), TickOutcome::Ignored);
        timer.add_bonus(10);
        assert_eq!(timer.remaining(), 10);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut timer = Countdown::new(10);
        timer.start();
        timer.tick();
        timer.reset(10);

        assert_eq!(timer, Countdown::new(10));
    }
}
