//! Working hours expressed as time-of-day ranges on a weekday.
//!
//! Working hours carry no date. [`WorkingHours::anchor`] pins them to a
//! calendar date in the salon's fixed UTC offset, producing absolute instants
//! the slot generator can compare against appointments.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, Result};

/// Parse a `HH:MM` (or `HH:MM:SS`) time of day.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| EngineError::InvalidTimeOfDay(s.to_string()))
}

/// Day-of-week index used by schedules: 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Combine a calendar date and a time of day in `offset` into a UTC instant.
pub fn local_instant(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_time(time);
    (local - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

/// A contiguous time-of-day range during which a professional takes bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Build from two `HH:MM` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_time_of_day(start)?,
            end: parse_time_of_day(end)?,
        })
    }

    /// The absolute `(day_start, day_end)` instants of these hours on `date`.
    pub fn anchor(&self, date: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            local_instant(date, self.start, offset),
            local_instant(date, self.end, offset),
        )
    }
}

impl fmt::Display for WorkingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

impl FromStr for WorkingHours {
    type Err = EngineError;

    /// Parses `"09:00-13:00"`.
    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| EngineError::InvalidTimeOfDay(s.to_string()))?;
        Self::parse(start, end)
    }
}

/// One weekly recurring block of working hours. A professional may have several
/// blocks on the same weekday (split shifts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHourBlock {
    /// 0 = Sunday through 6 = Saturday.
    pub weekday: u8,
    #[serde(flatten)]
    pub hours: WorkingHours,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl WorkingHourBlock {
    pub fn new(weekday: u8, hours: WorkingHours) -> Result<Self> {
        if weekday > 6 {
            return Err(EngineError::InvalidWeekday(weekday));
        }
        Ok(Self {
            weekday,
            hours,
            active: true,
        })
    }

    /// Whether this block is active and falls on the weekday of `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.active && self.weekday == weekday_index(date)
    }
}

mod hhmm {
    use super::*;

    pub fn serialize<S: Serializer>(
        time: &NaiveTime,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}
