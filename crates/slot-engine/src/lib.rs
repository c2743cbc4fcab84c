//! # slot-engine
//!
//! Deterministic appointment slot availability for salon calendars.
//!
//! Given one working-hour block for a calendar date, the intervals already
//! occupied on that date (active appointments and time-off blocks), a service
//! duration and a step size, the engine lists every bookable slot. It performs
//! no I/O and never reads the wall clock: the current instant is an argument.
//!
//! ## Modules
//!
//! - [`interval`] — Half-open time ranges and the overlap predicate
//! - [`status`] — Appointment statuses and which of them occupy time
//! - [`schedule`] — Time-of-day working hours and weekday blocks
//! - [`slots`] — Slot generation for one block, and for a split-shift day
//! - [`conflict`] — Write-time conflict check for a proposed booking
//! - [`error`] — Error types

pub mod conflict;
pub mod error;
pub mod interval;
pub mod schedule;
pub mod slots;
pub mod status;

pub use conflict::{find_conflicts, is_free, Booking, Conflict};
pub use error::EngineError;
pub use interval::{occupied_intervals, OccupiedInterval, Occupancy, TimeRange};
pub use schedule::{WorkingHourBlock, WorkingHours};
pub use slots::{
    available_slots, day_slots, Candidate, Slot, SlotCandidates, SlotRequest, Verdict,
    DEFAULT_STEP_MINUTES,
};
pub use status::AppointmentStatus;
