//! # pomocycle core library
//!
//! Business logic of a work/break interval timer: a Pomodoro cycle of work
//! intervals separated by short breaks, with a long break after every
//! N completed work intervals. Front ends (the `pomocycle` CLI, or any GUI)
//! read state from the core and invoke its operations; they never mutate
//! timer state themselves.
//!
//! ## Architecture
//!
//! - **Settings**: validated, clamped configuration persisted through an
//!   injected key-value store
//! - **Session cycle**: which interval is active and how many work intervals
//!   have completed
//! - **Countdown engine**: whole-second countdown driven by an external
//!   one-second `tick()`
//! - **Session controller**: composes the above and fires sound and
//!   notification side effects on completion
//!
//! ## Key Components
//!
//! - [`SessionController`]: the single owner of session state
//! - [`SessionCycle`]: interval state machine
//! - [`CountdownEngine`]: remaining-time counter
//! - [`SettingsStore`]: settings persistence
//! - [`IntervalTicker`]: tokio one-second scheduling source

pub mod capabilities;
pub mod controller;
pub mod error;
pub mod events;
pub mod settings;
pub mod storage;
pub mod timer;

pub use capabilities::{NoNotifier, NotificationPermission, Notifier, SilentPlayer, SoundPlayer};
pub use controller::{Capabilities, SessionController, SessionState};
pub use error::{CapabilityError, CoreError, StorageError};
pub use events::Event;
pub use settings::{Settings, SettingsStore, SoundId, SETTINGS_KEY};
pub use storage::{Database, KvStore, MemoryStore};
pub use timer::{
    CountdownEngine, IntervalTicker, IntervalType, SessionCycle, TickResult, TickSource,
    TickerHandle,
};
