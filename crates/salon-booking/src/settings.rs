//! Salon settings loaded from a TOML file.
//!
//! ```toml
//! [salon]
//! name = "Downtown Studio"
//! utc_offset = "-03:00"
//!
//! [booking]
//! slot_step_minutes = 30
//! horizon_days = 7
//! min_client_name_len = 2
//! min_phone_len = 8
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above (the
//! offset defaults to UTC).

use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use slot_engine::DEFAULT_STEP_MINUTES;

use crate::error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalonSettings {
    pub salon_name: String,
    /// Fixed offset of the salon's wall clock. Working hours and day
    /// boundaries are interpreted in it.
    pub utc_offset: FixedOffset,
    pub slot_step_minutes: u32,
    /// Number of days after today customers may book, today included.
    pub booking_horizon_days: u32,
    pub min_client_name_len: usize,
    pub min_phone_len: usize,
}

impl Default for SalonSettings {
    fn default() -> Self {
        Self {
            salon_name: "Salon".to_string(),
            utc_offset: Utc.fix(),
            slot_step_minutes: DEFAULT_STEP_MINUTES,
            booking_horizon_days: 7,
            min_client_name_len: 2,
            min_phone_len: 8,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    salon: SalonSection,
    booking: BookingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SalonSection {
    name: Option<String>,
    utc_offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BookingSection {
    slot_step_minutes: Option<u32>,
    horizon_days: Option<u32>,
    min_client_name_len: Option<usize>,
    min_phone_len: Option<usize>,
}

impl SalonSettings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(s)?;
        let defaults = Self::default();

        let utc_offset = match file.salon.utc_offset.as_deref() {
            Some(raw) => parse_utc_offset(raw)?,
            None => defaults.utc_offset,
        };

        let settings = Self {
            salon_name: file.salon.name.unwrap_or(defaults.salon_name),
            utc_offset,
            slot_step_minutes: file
                .booking
                .slot_step_minutes
                .unwrap_or(defaults.slot_step_minutes),
            booking_horizon_days: file
                .booking
                .horizon_days
                .unwrap_or(defaults.booking_horizon_days),
            min_client_name_len: file
                .booking
                .min_client_name_len
                .unwrap_or(defaults.min_client_name_len),
            min_phone_len: file.booking.min_phone_len.unwrap_or(defaults.min_phone_len),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.slot_step_minutes == 0 {
            return Err(SettingsError::Invalid {
                field: "slot_step_minutes",
                message: "must be at least 1".to_string(),
            });
        }
        if self.slot_step_minutes > 24 * 60 {
            return Err(SettingsError::Invalid {
                field: "slot_step_minutes",
                message: "must not exceed one day".to_string(),
            });
        }
        if self.booking_horizon_days == 0 {
            return Err(SettingsError::Invalid {
                field: "horizon_days",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM`, `Z` or `UTC` into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let invalid = || SettingsError::InvalidOffset(raw.to_string());
    let s = raw.trim();

    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
