//! Half-open time ranges and occupied intervals.
//!
//! Two ranges `[a, b)` and `[c, d)` overlap iff `a < d && b > c`. A range that
//! ends exactly when another starts does NOT overlap it, so back-to-back
//! appointments are allowed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::Booking;

/// A span between two absolute instants, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test.
    ///
    /// Inverted ranges (`end <= start`) are not normalized; the predicate is
    /// applied to them as written.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Minutes shared with `other`, or 0 when they do not overlap.
    pub fn overlap_minutes(&self, other: &TimeRange) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes().max(0)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Where an occupied interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    /// A pending or confirmed appointment.
    Appointment,
    /// Explicit time off for the professional.
    TimeOff,
}

/// A time range a slot must not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedInterval {
    pub range: TimeRange,
    pub kind: Occupancy,
}

impl OccupiedInterval {
    pub fn appointment(range: TimeRange) -> Self {
        Self {
            range,
            kind: Occupancy::Appointment,
        }
    }

    pub fn time_off(range: TimeRange) -> Self {
        Self {
            range,
            kind: Occupancy::TimeOff,
        }
    }

    /// Occupied interval for a booking, or `None` when its status leaves the
    /// time free (completed, cancelled, no-show).
    pub fn from_booking(booking: &Booking) -> Option<Self> {
        booking
            .status
            .occupies_time()
            .then(|| Self::appointment(booking.range))
    }
}

/// Merge appointments and time-off blocks into one occupied set.
///
/// Appointments are filtered through
/// [`AppointmentStatus::occupies_time`](crate::status::AppointmentStatus::occupies_time);
/// time-off blocks always occupy. Order is irrelevant to the engine, so the
/// result simply lists appointments first.
pub fn occupied_intervals(bookings: &[Booking], time_off: &[TimeRange]) -> Vec<OccupiedInterval> {
    bookings
        .iter()
        .filter_map(OccupiedInterval::from_booking)
        .chain(time_off.iter().copied().map(OccupiedInterval::time_off))
        .collect()
}
