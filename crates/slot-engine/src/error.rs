//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid time of day '{0}': expected HH:MM")]
    InvalidTimeOfDay(String),

    #[error("Invalid weekday {0}: expected 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekday(u8),

    #[error("Invalid appointment status: {0}")]
    InvalidStatus(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
