//! Session controller.
//!
//! Owns the settings, the [`SessionCycle`] and the [`CountdownEngine`] and is
//! the only thing that mutates them. Front ends call `start`/`pause`/`reset`
//! from user input and `tick` from their one-second scheduler.
//!
//! On completion the controller:
//! 1. stops the countdown and disarms the scheduler,
//! 2. plays the sound (regardless of the notification setting),
//! 3. notifies, naming the *next* interval, if notifications are enabled and
//!    permitted, or asks for permission if it is still undetermined,
//! 4. commits the transition and reloads the countdown,
//! 5. starts the next interval if the matching auto-start setting is on.
//!
//! Failures of any side effect are logged and never stop the cycle.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::capabilities::{NotificationPermission, Notifier, SoundPlayer};
use crate::events::Event;
use crate::settings::{Settings, SettingsStore, SoundId};
use crate::timer::{CountdownEngine, IntervalType, SessionCycle, TickSource};

pub const NOTIFICATION_TITLE: &str = "Timer Complete";

/// Injected side effects.
pub struct Capabilities {
    pub ticker: Box<dyn TickSource>,
    pub sound: Box<dyn SoundPlayer>,
    pub notifier: Box<dyn Notifier>,
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub current_interval: IntervalType,
    /// Work intervals completed since the controller was created.
    pub completed_work_count: u32,
    pub remaining_seconds: u64,
    pub is_running: bool,
}

pub struct SessionController {
    store: SettingsStore,
    settings: Settings,
    cycle: SessionCycle,
    countdown: CountdownEngine,
    ticker: Box<dyn TickSource>,
    sound: Box<dyn SoundPlayer>,
    notifier: Box<dyn Notifier>,
    /// A sound that failed to play, retried once on the next user action.
    pending_sound: Option<(SoundId, u8)>,
}

impl SessionController {
    /// Load settings from `store` and get ready for the first work interval.
    pub fn new(store: SettingsStore, caps: Capabilities) -> Self {
        let settings = store.load();
        let cycle = SessionCycle::new();
        let mut countdown = CountdownEngine::new();
        countdown.initialize(cycle.current().duration_secs(&settings));
        Self {
            store,
            settings,
            cycle,
            countdown,
            ticker: caps.ticker,
            sound: caps.sound,
            notifier: caps.notifier,
            pending_sound: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_interval(&self) -> IntervalType {
        self.cycle.current()
    }

    pub fn completed_work(&self) -> u32 {
        self.cycle.completed_work()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Full length of the current interval.
    pub fn total_secs(&self) -> u64 {
        self.cycle.current().duration_secs(&self.settings)
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            current_interval: self.cycle.current(),
            completed_work_count: self.cycle.completed_work(),
            remaining_seconds: self.countdown.remaining_secs(),
            is_running: self.countdown.is_running(),
        }
    }

    /// 0.0 .. 100.0 elapsed within the current interval.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.countdown.remaining_secs());
        elapsed as f64 / total as f64 * 100.0
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_remaining(&self) -> String {
        format_mm_ss(self.countdown.remaining_secs())
    }

    pub fn snapshot(&self) -> Event {
        let interval = self.cycle.current();
        Event::StateSnapshot {
            interval,
            display_name: interval.display_name().to_string(),
            remaining_secs: self.countdown.remaining_secs(),
            total_secs: self.total_secs(),
            remaining: self.formatted_remaining(),
            progress_pct: self.progress_pct(),
            completed_work: self.cycle.completed_work(),
            running: self.countdown.is_running(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `None` if already running.
    pub fn start(&mut self) -> Option<Event> {
        self.retry_pending_sound();
        if !self.start_countdown() {
            return None;
        }
        Some(Event::TimerStarted {
            interval: self.cycle.current(),
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// `None` if already paused.
    pub fn pause(&mut self) -> Option<Event> {
        self.retry_pending_sound();
        if !self.countdown.pause() {
            return None;
        }
        self.ticker.disarm();
        tracing::debug!(remaining = self.countdown.remaining_secs(), "paused");
        Some(Event::TimerPaused {
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Stop and reload the full duration of the current interval.
    ///
    /// The interval and the completed-work count are left alone.
    pub fn reset(&mut self) -> Event {
        self.retry_pending_sound();
        self.reset_countdown();
        tracing::debug!(interval = %self.cycle.current(), "reset");
        Event::TimerReset {
            interval: self.cycle.current(),
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Replace the settings, persist them and reload the countdown.
    ///
    /// A running countdown keeps running from the new full duration.
    pub fn on_settings_changed(&mut self, settings: Settings) -> Event {
        self.retry_pending_sound();
        let settings = settings.clamped();
        if let Err(e) = self.store.save(&settings) {
            tracing::warn!("failed to persist settings: {e}");
        }
        self.settings = settings;

        let was_running = self.countdown.is_running();
        self.reset_countdown();
        if was_running {
            self.start_countdown();
        }

        Event::SettingsChanged {
            settings: self.settings.clone(),
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Call once per elapsed second.
    ///
    /// Returns `Some(Event::IntervalCompleted)` on the tick that finishes the
    /// interval; ticks while stopped are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        let result = self.countdown.tick()?;
        if result.completed {
            Some(self.on_interval_complete())
        } else {
            None
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_interval_complete(&mut self) -> Event {
        self.countdown.pause();
        self.ticker.disarm();

        let completed = self.cycle.current();
        let long_break_interval = self.settings.long_break_interval;
        let next = self.cycle.preview(long_break_interval);
        let auto_start = self.auto_starts(next);

        self.play_sound();
        if self.settings.notifications_enabled {
            self.notify(next, auto_start);
        }

        self.cycle.advance(long_break_interval);
        self.reset_countdown();
        tracing::info!(
            %completed,
            %next,
            completed_work = self.cycle.completed_work(),
            "interval complete"
        );

        let auto_started = auto_start && self.start_countdown();
        Event::IntervalCompleted {
            completed,
            next,
            completed_work: self.cycle.completed_work(),
            auto_started,
            at: Utc::now(),
        }
    }

    fn auto_starts(&self, next: IntervalType) -> bool {
        if next.is_break() {
            self.settings.auto_start_breaks
        } else {
            self.settings.auto_start_pomodoros
        }
    }

    fn start_countdown(&mut self) -> bool {
        if !self.countdown.start() {
            return false;
        }
        self.ticker.arm();
        tracing::debug!(
            interval = %self.cycle.current(),
            remaining = self.countdown.remaining_secs(),
            "started"
        );
        true
    }

    fn reset_countdown(&mut self) {
        self.countdown.reset(self.total_secs());
        self.ticker.disarm();
    }

    fn play_sound(&mut self) {
        let (sound, volume) = (self.settings.sound, self.settings.volume);
        if let Err(e) = self.sound.play(sound, volume) {
            tracing::warn!("completion sound failed, will retry on next action: {e}");
            self.pending_sound = Some((sound, volume));
        }
    }

    fn retry_pending_sound(&mut self) {
        if let Some((sound, volume)) = self.pending_sound.take() {
            if let Err(e) = self.sound.play(sound, volume) {
                tracing::warn!("deferred completion sound failed: {e}");
            }
        }
    }

    fn notify(&self, next: IntervalType, auto_start: bool) {
        match self.notifier.permission_state() {
            NotificationPermission::Granted => {
                let body = notification_body(next, auto_start);
                if let Err(e) = self.notifier.show(NOTIFICATION_TITLE, &body) {
                    tracing::warn!("failed to show notification: {e}");
                }
            }
            NotificationPermission::Undetermined => {
                if let Err(e) = self.notifier.request_permission() {
                    tracing::warn!("notification permission request failed: {e}");
                }
            }
            NotificationPermission::Denied => {
                tracing::debug!("notifications denied by platform");
            }
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("settings", &self.settings)
            .field("cycle", &self.cycle)
            .field("countdown", &self.countdown)
            .finish_non_exhaustive()
    }
}

/// Body of the completion notification.
pub fn notification_body(next: IntervalType, auto_start: bool) -> String {
    if auto_start {
        format!("Time for {}.", next.label())
    } else {
        format!("Time for {}. Click to start.", next.label())
    }
}

/// `MM:SS`; minutes keep growing past 99.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
