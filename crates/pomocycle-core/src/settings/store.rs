use super::Settings;
use crate::error::StorageError;
use crate::storage::KvStore;

/// Key of the persisted settings record.
pub const SETTINGS_KEY: &str = "pomodoro:settings";

/// Loads and persists [`Settings`] through an injected [`KvStore`].
pub struct SettingsStore {
    kv: Box<dyn KvStore>,
}

impl SettingsStore {
    pub fn new(kv: impl KvStore + 'static) -> Self {
        Self { kv: Box::new(kv) }
    }

    pub fn defaults() -> Settings {
        Settings::default()
    }

    /// Stored settings merged over the defaults. Never fails.
    pub fn load(&self) -> Settings {
        match self.kv.get(SETTINGS_KEY) {
            Ok(Some(raw)) => Settings::from_json_lenient(&raw),
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!("failed to read settings, using defaults: {e}");
                Settings::default()
            }
        }
    }

    /// Clamp and persist. Returns the value that was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn save(&self, settings: &Settings) -> Result<Settings, StorageError> {
        let settings = settings.clone().clamped();
        let record = serde_json::to_string(&settings)
            .map_err(|e| StorageError::QueryFailed(format!("cannot encode settings: {e}")))?;
        self.kv.set(SETTINGS_KEY, &record)?;
        tracing::debug!(record = %record, "settings saved");
        Ok(settings)
    }

    /// Persist the defaults.
    pub fn reset(&self) -> Result<Settings, StorageError> {
        self.save(&Settings::default())
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SoundId;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn load_missing_returns_defaults() {
        let store = SettingsStore::new(MemoryStore::new());
        assert_eq!(store.load(), SettingsStore::defaults());
    }

    #[test]
    fn load_corrupt_returns_defaults() {
        let store = SettingsStore::new(MemoryStore::with_entry(SETTINGS_KEY, "\u{0}garbage"));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn load_read_error_returns_defaults() {
        let store = SettingsStore::new(BrokenStore);
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn save_clamps_before_persisting() {
        let mem = MemoryStore::new();
        let store = SettingsStore::new(mem.clone());

        let saved = store
            .save(&Settings {
                work_duration: 999,
                ..Settings::default()
            })
            .unwrap();
        assert_eq!(saved.work_duration, 60);
        let raw: serde_json::Value =
            serde_json::from_str(&mem.raw(SETTINGS_KEY).unwrap()).unwrap();
        assert_eq!(raw["workDuration"], 60);

        store
            .save(&Settings {
                work_duration: 0,
                ..Settings::default()
            })
            .unwrap();
        assert_eq!(store.load().work_duration, 1);
    }

    #[test]
    fn save_of_load_is_a_fixed_point() {
        let mem = MemoryStore::with_entry(
            SETTINGS_KEY,
            r#"{"workDuration": 90, "sound": "ding", "extra": [1], "volume": 12.0}"#,
        );
        let store = SettingsStore::new(mem.clone());

        store.save(&store.load()).unwrap();
        let first = mem.raw(SETTINGS_KEY).unwrap();
        store.save(&store.load()).unwrap();
        let second = mem.raw(SETTINGS_KEY).unwrap();
        assert_eq!(first, second);

        let loaded = store.load();
        assert_eq!(loaded.work_duration, 60);
        assert_eq!(loaded.sound, SoundId::Ding);
        assert_eq!(loaded.volume, 12);
    }

    #[test]
    fn save_error_is_reported() {
        let store = SettingsStore::new(BrokenStore);
        assert!(store.save(&Settings::default()).is_err());
    }

    #[test]
    fn reset_persists_defaults() {
        let mem = MemoryStore::with_entry(SETTINGS_KEY, r#"{"workDuration": 50}"#);
        let store = SettingsStore::new(mem);
        assert_eq!(store.reset().unwrap(), Settings::default());
        assert_eq!(store.load(), Settings::default());
    }
}
