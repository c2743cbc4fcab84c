//! Error types for salon-booking operations.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Failures raised by a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The insert would overlap an active appointment of the same professional.
    #[error("Appointment overlaps an active booking of professional {professional_id}")]
    Conflict { professional_id: Uuid },

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Appointment {0} not found")]
    AppointmentNotFound(Uuid),
}

/// Errors from loading or validating [`SalonSettings`](crate::settings::SalonSettings).
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid UTC offset '{0}': expected +HH:MM, -HH:MM or Z")]
    InvalidOffset(String),

    #[error("Invalid setting {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Errors from availability queries.
///
/// An empty day is never an error; these only cover lookups that cannot be
/// answered at all.
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Unknown or inactive service {0}")]
    UnknownService(Uuid),

    #[error("Unknown professional {0}")]
    UnknownProfessional(Uuid),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the booking flow.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Unknown or inactive service {0}")]
    UnknownService(Uuid),

    #[error("Unknown or inactive professional {0}")]
    UnknownProfessional(Uuid),

    #[error("Unknown appointment {0}")]
    UnknownAppointment(Uuid),

    /// The requested time was taken between listing and booking.
    #[error("The selected time is no longer available")]
    SlotUnavailable,

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl BookingError {
    /// Conflicts are retryable by picking another slot; nothing else is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::SlotUnavailable)
    }

    /// Message suitable for showing to the customer.
    pub fn user_message(&self) -> String {
        match self {
            BookingError::SlotUnavailable => {
                "The selected time is no longer available, please choose another time".to_string()
            }
            BookingError::Validation { message, .. } => message.clone(),
            BookingError::UnknownService(_) | BookingError::UnknownProfessional(_) => {
                "The selected service or professional is not available".to_string()
            }
            BookingError::UnknownAppointment(_) => "The appointment no longer exists".to_string(),
            BookingError::Store(_) => "Something went wrong, please try again later".to_string(),
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => BookingError::SlotUnavailable,
            StoreError::AppointmentNotFound(id) => BookingError::UnknownAppointment(id),
            other => BookingError::Store(other),
        }
    }
}
