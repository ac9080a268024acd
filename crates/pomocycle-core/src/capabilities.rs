//! Side-effect capabilities injected into the controller.
//!
//! All of them are best effort: the controller logs a failure and carries on.

use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;
use crate::settings::SoundId;

/// Platform notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Neither granted nor denied yet; asking is allowed.
    Undetermined,
}

/// Plays the completion sound.
pub trait SoundPlayer {
    fn play(&self, sound: SoundId, volume_pct: u8) -> Result<(), CapabilityError>;
}

/// Desktop notifications.
pub trait Notifier {
    fn permission_state(&self) -> NotificationPermission;

    /// Ask the platform for permission. Fire-and-forget: the outcome is
    /// observed later through [`permission_state`](Self::permission_state).
    fn request_permission(&self) -> Result<(), CapabilityError>;

    fn show(&self, title: &str, body: &str) -> Result<(), CapabilityError>;
}

/// Sound player for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&self, _sound: SoundId, _volume_pct: u8) -> Result<(), CapabilityError> {
        Ok(())
    }
}

/// Notifier for platforms without notifications. Always reports `Denied`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNotifier;

impl Notifier for NoNotifier {
    fn permission_state(&self) -> NotificationPermission {
        NotificationPermission::Denied
    }

    fn request_permission(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    fn show(&self, _title: &str, _body: &str) -> Result<(), CapabilityError> {
        Ok(())
    }
}
