//! Core error types for sobertrack-core.
//!
//! Validation failures are raised only at write and boundary operations.
//! The streak calculator itself never fails.

use std::path::PathBuf;
use thiserror::Error;

use crate::calendar::CalendarDate;

/// Core error type for sobertrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No profile has been set up for the user
    #[error("No profile found for user '{0}'")]
    ProfileNotFound(String),

    /// Onboarding attempted for a user who already has a profile
    #[error("Profile already exists for user '{0}'; correct the sobriety date instead")]
    ProfileExists(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors surfaced directly to the user-facing layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a well-formed `YYYY-MM-DD` calendar date
    #[error("Invalid date '{input}': expected a calendar date in YYYY-MM-DD format")]
    InvalidDateFormat { input: String },

    /// Recovery restart precedes the slip-up itself
    #[error("Recovery restart date ({restart}) must not be before the slip-up date ({slip})")]
    RestartBeforeSlip {
        slip: CalendarDate,
        restart: CalendarDate,
    },

    /// Slip-up dated after today in the user's timezone
    #[error("Slip-up date ({slip}) is after today ({today})")]
    FutureSlipDate {
        slip: CalendarDate,
        today: CalendarDate,
    },

    /// Sobriety date set after today in the user's timezone
    #[error("Sobriety date ({date}) is after today ({today})")]
    FutureSobrietyDate {
        date: CalendarDate,
        today: CalendarDate,
    },

    /// Not a known IANA timezone identifier
    #[error("Unknown IANA timezone: '{0}'")]
    InvalidTimezone(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_database_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(matches!(DatabaseError::from(err), DatabaseError::Locked));
    }

    #[test]
    fn validation_messages_name_the_dates() {
        let err = ValidationError::RestartBeforeSlip {
            slip: "2024-06-02".parse().unwrap(),
            restart: "2024-06-01".parse().unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2024-06-01"));
        assert!(msg.contains("2024-06-02"));
    }
}
