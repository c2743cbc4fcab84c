//! Appointment lifecycle statuses.
//!
//! Whether an appointment blocks a professional's calendar depends only on its
//! status. Both the read-time slot computation and the write-time conflict
//! check go through [`AppointmentStatus::occupies_time`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Requested (typically online) and not yet confirmed by staff.
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Statuses that occupy the professional's time.
    pub const ACTIVE: [AppointmentStatus; 2] =
        [AppointmentStatus::Pending, AppointmentStatus::Confirmed];

    /// `true` for pending and confirmed appointments. Completed, cancelled and
    /// no-show appointments leave their time range free.
    pub fn occupies_time(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            "no_show" | "no-show" => Ok(AppointmentStatus::NoShow),
            _ => Err(EngineError::InvalidStatus(s.to_string())),
        }
    }
}
