//! Countdown engine.
//!
//! Counts whole seconds. It does not use internal threads or read the
//! clock: the caller invokes `tick()` once per elapsed second while the
//! engine is running, and each call removes exactly one second. Drift from
//! a late scheduler is not compensated.
//!
//! ## Usage
//!
//! ```
//! use pomocycle_core::CountdownEngine;
//!
//! let mut engine = CountdownEngine::new();
//! engine.initialize(2);
//! engine.start();
//! assert!(!engine.tick().unwrap().completed);
//! assert!(engine.tick().unwrap().completed);
//! assert!(!engine.is_running());
//! ```

use serde::{Deserialize, Serialize};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    pub remaining_secs: u64,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownEngine {
    remaining_secs: u64,
    running: bool,
}

impl CountdownEngine {
    /// An exhausted, stopped engine. Call [`initialize`](Self::initialize) before use.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Load a fresh duration. Ignored while running or for a zero duration.
    pub fn initialize(&mut self, duration_secs: u64) {
        if self.running {
            tracing::debug!("countdown: initialize ignored while running");
            return;
        }
        if duration_secs == 0 {
            tracing::debug!("countdown: initialize ignored for zero duration");
            return;
        }
        self.remaining_secs = duration_secs;
    }

    /// Returns `true` if the engine transitioned to running.
    ///
    /// No-op when already running or exhausted.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining_secs == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Returns `true` if the engine was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Remove one second. `None` while stopped.
    ///
    /// The tick that reaches zero reports `completed` and stops the engine,
    /// so completion is reported exactly once per initialization.
    pub fn tick(&mut self) -> Option<TickResult> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let completed = self.remaining_secs == 0;
        if completed {
            self.running = false;
        }
        Some(TickResult {
            remaining_secs: self.remaining_secs,
            completed,
        })
    }

    pub fn reset(&mut self, duration_secs: u64) {
        self.pause();
        self.initialize(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running(duration: u64) -> CountdownEngine {
        let mut engine = CountdownEngine::new();
        engine.initialize(duration);
        assert!(engine.start());
        engine
    }

    #[test]
    fn new_engine_cannot_start() {
        let mut engine = CountdownEngine::new();
        assert!(!engine.start());
        assert!(!engine.is_running());
    }

    #[test]
    fn exhausted_engine_cannot_restart() {
        let mut engine = running(1);
        assert!(engine.tick().unwrap().completed);
        assert!(!engine.start());
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn pause_is_idempotent() {
        let mut engine = running(10);
        assert!(engine.pause());
        assert!(!engine.is_running());
        assert!(!engine.pause());
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_secs(), 10);
    }

    #[test]
    fn tick_while_paused_is_ignored() {
        let mut engine = running(10);
        engine.tick();
        engine.pause();
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.remaining_secs(), 9);
    }

    #[test]
    fn start_twice_is_noop() {
        let mut engine = running(5);
        assert!(!engine.start());
        assert!(engine.is_running());
    }

    #[test]
    fn initialize_while_running_is_ignored() {
        let mut engine = running(5);
        engine.initialize(100);
        assert_eq!(engine.remaining_secs(), 5);
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut engine = CountdownEngine::new();
        engine.initialize(30);
        engine.initialize(0);
        assert_eq!(engine.remaining_secs(), 30);
    }

    #[test]
    fn reset_mid_run() {
        let mut engine = running(60);
        for _ in 0..30 {
            engine.tick();
        }
        assert_eq!(engine.remaining_secs(), 30);
        engine.reset(60);
        assert_eq!(engine.remaining_secs(), 60);
        assert!(!engine.is_running());
    }

    proptest! {
        #[test]
        fn completes_on_exactly_the_last_tick(duration in 1u64..2_000) {
            let mut engine = running(duration);
            let mut previous = duration;
            for i in 1..=duration {
                let result = engine.tick().unwrap();
                prop_assert_eq!(result.remaining_secs, previous - 1);
                prop_assert_eq!(result.completed, i == duration);
                previous = result.remaining_secs;
            }
            prop_assert!(!engine.is_running());
            prop_assert_eq!(engine.tick(), None);
        }
    }
}
