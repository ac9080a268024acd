//! Core error types for pomocycle-core.
//!
//! None of these ever escape the [`SessionController`](crate::SessionController):
//! it logs them and keeps counting. They are surfaced by the lower-level
//! building blocks (stores, capabilities) so that callers outside the
//! controller, like the CLI's config commands, can report them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomocycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid settings edit (unknown key, wrong value type)
    #[error("Invalid value for '{key}': {message}")]
    InvalidSetting { key: String, message: String },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Could not resolve or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Failures of the injected side-effect capabilities.
#[derive(Error, Debug)]
pub enum CapabilityError {
    /// The device refused or could not play audio
    #[error("Audio playback failed: {0}")]
    Playback(String),

    /// The notification could not be shown or permission could not be requested
    #[error("Notification failed: {0}")]
    Notification(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}
