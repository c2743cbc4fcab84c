//! Write-time conflict check for a proposed appointment.
//!
//! Re-applies the same half-open overlap predicate the slot generator uses,
//! restricted to bookings whose status occupies time. Adjacent bookings (one
//! ends exactly when the other starts) are NOT conflicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::TimeRange;
use crate::status::AppointmentStatus;

/// The part of a stored appointment the engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(flatten)]
    pub range: TimeRange,
    pub status: AppointmentStatus,
}

impl Booking {
    pub fn new(range: TimeRange, status: AppointmentStatus) -> Self {
        Self { range, status }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.range.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.range.end
    }
}

/// An existing booking that collides with a proposed range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub booking: Booking,
    pub overlap_minutes: i64,
}

/// Find every active booking overlapping `proposed`.
///
/// Bookings that are completed, cancelled or no-show are ignored. The result
/// keeps the input order.
pub fn find_conflicts(proposed: &TimeRange, bookings: &[Booking]) -> Vec<Conflict> {
    bookings
        .iter()
        .filter(|b| b.status.occupies_time() && proposed.overlaps(&b.range))
        .map(|b| Conflict {
            booking: *b,
            overlap_minutes: proposed.overlap_minutes(&b.range),
        })
        .collect()
}

/// `true` when no active booking overlaps `proposed`.
pub fn is_free(proposed: &TimeRange, bookings: &[Booking]) -> bool {
    !bookings
        .iter()
        .any(|b| b.status.occupies_time() && proposed.overlaps(&b.range))
}
