//! Error types for the SLA engine.
//!
//! Only the building blocks return these. The engine operations themselves
//! degrade to defaults instead of failing.

use thiserror::Error;

/// Result type alias for SLA engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building calendars or installing logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Calendar errors
    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid work days: {0}")]
    InvalidWorkDays(String),

    #[error("Invalid calendar: {0}")]
    InvalidCalendar(String),

    // Settings errors
    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    // Ticket errors
    #[error("Unknown ticket status: {0}")]
    UnknownStatus(String),

    // Logging errors
    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}
