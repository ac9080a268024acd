//! User-adjustable timer settings.
//!
//! A [`Settings`] value is replaced wholesale, never edited in place. Every
//! way of producing one (defaults, decoding, key edits) goes through
//! [`Settings::clamped`], so out-of-range numbers are coerced into range
//! instead of being rejected.
//!
//! The persisted form is a flat JSON object:
//!
//! ```json
//! {"workDuration":20,"shortBreak":5,"longBreak":15,"longBreakInterval":4,
//!  "autoStartBreaks":true,"autoStartPomodoros":true,"notifications":true,
//!  "sound":"bell","volume":70}
//! ```

mod store;

pub use store::{SettingsStore, SETTINGS_KEY};

use std::num::IntErrorKind;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

pub const KEY_WORK: &str = "workDuration";
pub const KEY_SHORT_BREAK: &str = "shortBreak";
pub const KEY_LONG_BREAK: &str = "longBreak";
pub const KEY_LONG_BREAK_INTERVAL: &str = "longBreakInterval";
pub const KEY_AUTO_START_BREAKS: &str = "autoStartBreaks";
pub const KEY_AUTO_START_POMODOROS: &str = "autoStartPomodoros";
pub const KEY_NOTIFICATIONS: &str = "notifications";
pub const KEY_SOUND: &str = "sound";
pub const KEY_VOLUME: &str = "volume";

/// Every key of the persisted record, in serialization order.
pub const KEYS: [&str; 9] = [
    KEY_WORK,
    KEY_SHORT_BREAK,
    KEY_LONG_BREAK,
    KEY_LONG_BREAK_INTERVAL,
    KEY_AUTO_START_BREAKS,
    KEY_AUTO_START_POMODOROS,
    KEY_NOTIFICATIONS,
    KEY_SOUND,
    KEY_VOLUME,
];

const DURATION_RANGE: (u32, u32) = (1, 60);
const LONG_BREAK_INTERVAL_RANGE: (u32, u32) = (1, 10);
const VOLUME_MAX: u8 = 100;

/// Completion sound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundId {
    #[default]
    Bell,
    Chime,
    Ding,
    Gong,
}

impl SoundId {
    pub const ALL: [SoundId; 4] = [SoundId::Bell, SoundId::Chime, SoundId::Ding, SoundId::Gong];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundId::Bell => "bell",
            SoundId::Chime => "chime",
            SoundId::Ding => "ding",
            SoundId::Gong => "gong",
        }
    }
}

impl FromStr for SoundId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CoreError::InvalidSetting {
                key: KEY_SOUND.to_string(),
                message: format!("unknown sound '{s}' (expected bell, chime, ding or gong)"),
            })
    }
}

impl std::fmt::Display for SoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timer configuration. Durations are in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    #[serde(rename = "workDuration")]
    pub work_duration: u32,
    #[serde(rename = "shortBreak")]
    pub short_break_duration: u32,
    #[serde(rename = "longBreak")]
    pub long_break_duration: u32,
    /// Completed work intervals before a long break.
    #[serde(rename = "longBreakInterval")]
    pub long_break_interval: u32,
    #[serde(rename = "autoStartBreaks")]
    pub auto_start_breaks: bool,
    #[serde(rename = "autoStartPomodoros")]
    pub auto_start_pomodoros: bool,
    #[serde(rename = "notifications")]
    pub notifications_enabled: bool,
    pub sound: SoundId,
    /// Percent, 0..=100.
    pub volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: 20,
            short_break_duration: 5,
            long_break_duration: 15,
            long_break_interval: 4,
            auto_start_breaks: true,
            auto_start_pomodoros: true,
            notifications_enabled: true,
            sound: SoundId::Bell,
            volume: 70,
        }
    }
}

impl Settings {
    /// Coerce every numeric field into its allowed range.
    pub fn clamped(self) -> Self {
        let (lo, hi) = DURATION_RANGE;
        let (ilo, ihi) = LONG_BREAK_INTERVAL_RANGE;
        Self {
            work_duration: self.work_duration.clamp(lo, hi),
            short_break_duration: self.short_break_duration.clamp(lo, hi),
            long_break_duration: self.long_break_duration.clamp(lo, hi),
            long_break_interval: self.long_break_interval.clamp(ilo, ihi),
            volume: self.volume.min(VOLUME_MAX),
            ..self
        }
    }

    /// Decode a persisted record, field by field.
    ///
    /// Missing fields, fields of the wrong type, non-integral numbers and
    /// unknown sounds fall back to the default for that field. Unknown keys
    /// are ignored. Anything that is not an object yields the defaults.
    pub fn from_value_lenient(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(obj) = value.as_object() else {
            return defaults;
        };

        let (lo, hi) = DURATION_RANGE;
        let (ilo, ihi) = LONG_BREAK_INTERVAL_RANGE;
        Self {
            work_duration: int_field(obj, KEY_WORK, lo, hi).unwrap_or(defaults.work_duration),
            short_break_duration: int_field(obj, KEY_SHORT_BREAK, lo, hi)
                .unwrap_or(defaults.short_break_duration),
            long_break_duration: int_field(obj, KEY_LONG_BREAK, lo, hi)
                .unwrap_or(defaults.long_break_duration),
            long_break_interval: int_field(obj, KEY_LONG_BREAK_INTERVAL, ilo, ihi)
                .unwrap_or(defaults.long_break_interval),
            auto_start_breaks: bool_field(obj, KEY_AUTO_START_BREAKS)
                .unwrap_or(defaults.auto_start_breaks),
            auto_start_pomodoros: bool_field(obj, KEY_AUTO_START_POMODOROS)
                .unwrap_or(defaults.auto_start_pomodoros),
            notifications_enabled: bool_field(obj, KEY_NOTIFICATIONS)
                .unwrap_or(defaults.notifications_enabled),
            sound: obj
                .get(KEY_SOUND)
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sound),
            volume: int_field(obj, KEY_VOLUME, 0, u32::from(VOLUME_MAX))
                .and_then(|v| u8::try_from(v).ok())
                .unwrap_or(defaults.volume),
        }
    }

    /// Decode a raw JSON string; unparseable input yields the defaults.
    pub fn from_json_lenient(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value_lenient(&value),
            Err(e) => {
                tracing::warn!("settings record is not valid JSON, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Value of one field as a string, by its persisted key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// A copy with one field replaced, parsed according to the field's type.
    ///
    /// Numbers are clamped silently.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// as the field's type.
    pub fn with_value(&self, key: &str, value: &str) -> Result<Self, CoreError> {
        let invalid = |message: String| CoreError::InvalidSetting {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(self)?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| invalid("settings did not serialize to an object".into()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| invalid("unknown settings key".into()))?;

        let new_value = match existing {
            Value::Bool(_) => Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            Value::Number(_) => Value::Number(
                parse_saturating(value)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as integer")))?
                    .into(),
            ),
            _ => {
                let sound: SoundId = value.parse()?;
                Value::String(sound.as_str().to_string())
            }
        };

        obj.insert(key.to_string(), new_value);
        Ok(Self::from_value_lenient(&json))
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value_lenient(&value))
    }
}

/// Integral number at `key`, clamped into `lo..=hi`.
fn int_field(obj: &Map<String, Value>, key: &str, lo: u32, hi: u32) -> Option<u32> {
    let value = obj.get(key)?;
    let n = if let Some(n) = value.as_i64() {
        n
    } else if value.as_u64().is_some() {
        i64::MAX
    } else {
        let f = value.as_f64()?;
        if !f.is_finite() || f.fract() != 0.0 {
            return None;
        }
        f as i64
    };
    Some(n.clamp(i64::from(lo), i64::from(hi)) as u32)
}

/// Integer parse that saturates on overflow; `None` only for non-numbers.
fn parse_saturating(value: &str) -> Option<i64> {
    match value.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key)?.as_bool()
}
