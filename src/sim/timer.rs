//! Cancellable scheduled tasks driven by the simulation clock
//!
//! A task is armed with a duration, advanced every tick, and fires exactly
//! once when its elapsed time reaches the duration. Cancelling hands back the
//! time already elapsed so the owner can reschedule with what is left.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Total delay requested when the task was scheduled
    duration: f32,
    /// Time advanced since scheduling
    elapsed: f32,
    armed: bool,
}

impl ScheduledTask {
    /// An idle task that will never fire until scheduled
    pub const fn idle() -> Self {
        Self {
            duration: 0.0,
            elapsed: 0.0,
            armed: false,
        }
    }

    /// Arm the task to fire after `duration` seconds, replacing any pending run
    pub fn schedule(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
        self.armed = true;
    }

    /// Disarm the task. Returns the elapsed time if it was pending.
    pub fn cancel(&mut self) -> Option<f32> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        Some(self.elapsed)
    }

    /// Cancel and re-arm with the unelapsed part of the original delay.
    ///
    /// Returns the new delay. Does nothing and returns `None` on an idle task.
    pub fn reschedule_remaining(&mut self) -> Option<f32> {
        let duration = self.duration;
        let elapsed = self.cancel()?;
        let remaining = (duration - elapsed).max(0.0);
        self.schedule(remaining);
        Some(remaining)
    }

    /// Advance the clock. Returns true on the tick the task fires.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.armed = false;
            return true;
        }
        false
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.armed
    }

    /// Time left before firing, zero when idle
    pub fn remaining(&self) -> f32 {
        if self.armed {
            (self.duration - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }
}
