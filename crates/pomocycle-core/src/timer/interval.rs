use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// One timed block of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntervalType {
    Work,
    ShortBreak,
    LongBreak,
}

impl IntervalType {
    /// Heading shown above the countdown.
    pub fn display_name(self) -> &'static str {
        match self {
            IntervalType::Work => "Focus Time",
            IntervalType::ShortBreak => "Short Break",
            IntervalType::LongBreak => "Long Break",
        }
    }

    /// Short name used in notification text.
    pub fn label(self) -> &'static str {
        match self {
            IntervalType::Work => "Work",
            IntervalType::ShortBreak => "Short Break",
            IntervalType::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, IntervalType::Work)
    }

    /// Configured length in minutes.
    pub fn duration_min(self, settings: &Settings) -> u32 {
        match self {
            IntervalType::Work => settings.work_duration,
            IntervalType::ShortBreak => settings.short_break_duration,
            IntervalType::LongBreak => settings.long_break_duration,
        }
    }

    /// Configured length in seconds.
    pub fn duration_secs(self, settings: &Settings) -> u64 {
        u64::from(self.duration_min(settings)).saturating_mul(60)
    }
}

impl std::fmt::Display for IntervalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
