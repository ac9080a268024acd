//! Terminal and desktop implementations of the core's side-effect capabilities.

use std::io::Write;

use notify_rust::Notification;
use pomocycle_core::{
    CapabilityError, NotificationPermission, Notifier, SoundId, SoundPlayer, TickSource,
};

/// Rings the terminal bell. Volume 0 is silent; otherwise the terminal decides.
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&self, sound: SoundId, volume_pct: u8) -> Result<(), CapabilityError> {
        if volume_pct == 0 {
            return Ok(());
        }
        tracing::debug!(%sound, volume_pct, "ringing terminal bell");
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| CapabilityError::Playback(e.to_string()))
    }
}

/// Desktop notifications through the platform notification server.
///
/// Desktop platforms have no permission prompt, so permission is always granted.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn permission_state(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    fn request_permission(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    fn show(&self, title: &str, body: &str) -> Result<(), CapabilityError> {
        Notification::new()
            .summary(title)
            .body(body)
            .timeout(0) // No auto-dismiss
            .show()
            .map(|_| ())
            .map_err(|e| CapabilityError::Notification(e.to_string()))
    }
}

/// Tick source for commands that never run the countdown.
pub struct Detached;

impl TickSource for Detached {
    fn arm(&self) {}
    fn disarm(&self) {}
}
