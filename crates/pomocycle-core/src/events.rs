use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::timer::IntervalType;

/// Every state change of the controller produces an Event.
/// Front ends render them; nothing in the core consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        interval: IntervalType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        interval: IntervalType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// An interval ran down to zero and the cycle moved on.
    IntervalCompleted {
        completed: IntervalType,
        next: IntervalType,
        completed_work: u32,
        /// Whether `next` was started automatically.
        auto_started: bool,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        settings: Settings,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        interval: IntervalType,
        display_name: String,
        remaining_secs: u64,
        total_secs: u64,
        /// `MM:SS`
        remaining: String,
        progress_pct: f64,
        completed_work: u32,
        running: bool,
        at: DateTime<Utc>,
    },
}
