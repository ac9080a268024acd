//! Interval sequencing.
//!
//! ```text
//! Work --(count % long_break_interval != 0)--> ShortBreak --> Work
//! Work --(count % long_break_interval == 0)--> LongBreak  --> Work
//! ```
//!
//! `count` is the number of completed work intervals *including* the one
//! that just finished. Nothing else moves the cycle; a manual reset of the
//! countdown leaves it untouched.

use serde::{Deserialize, Serialize};

use super::interval::IntervalType;

/// Pure transition function.
///
/// Returns the interval that follows `current` and the updated completed-work
/// count.
pub fn next_interval(
    current: IntervalType,
    completed_work: u32,
    long_break_interval: u32,
) -> (IntervalType, u32) {
    match current {
        IntervalType::Work => {
            let count = completed_work.saturating_add(1);
            // An interval of 0 cannot come out of clamped settings; treat it as 1.
            let every = long_break_interval.max(1);
            if count % every == 0 {
                (IntervalType::LongBreak, count)
            } else {
                (IntervalType::ShortBreak, count)
            }
        }
        IntervalType::ShortBreak | IntervalType::LongBreak => (IntervalType::Work, completed_work),
    }
}

/// The session state machine: current interval plus completed work count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCycle {
    current: IntervalType,
    completed_work: u32,
}

impl SessionCycle {
    /// Starts at `Work` with nothing completed.
    pub fn new() -> Self {
        Self {
            current: IntervalType::Work,
            completed_work: 0,
        }
    }

    pub fn current(&self) -> IntervalType {
        self.current
    }

    pub fn completed_work(&self) -> u32 {
        self.completed_work
    }

    /// The interval that would follow, without committing the transition.
    pub fn preview(&self, long_break_interval: u32) -> IntervalType {
        next_interval(self.current, self.completed_work, long_break_interval).0
    }

    /// Commit the transition for a naturally completed interval.
    pub fn advance(&mut self, long_break_interval: u32) -> IntervalType {
        let (next, count) = next_interval(self.current, self.completed_work, long_break_interval);
        self.current = next;
        self.completed_work = count;
        next
    }

    /// The next `count` intervals after the current one.
    pub fn plan(&self, long_break_interval: u32, count: usize) -> Vec<IntervalType> {
        let mut cursor = *self;
        (0..count)
            .map(|_| cursor.advance(long_break_interval))
            .collect()
    }
}

impl Default for SessionCycle {
    fn default() -> Self {
        Self::new()
    }
}
