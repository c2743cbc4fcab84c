//! Bookable slot generation for a working-hour block.
//!
//! Candidates start at the beginning of the block and advance by a fixed step.
//! A candidate `[cursor, cursor + duration)` is emitted when it fits inside the
//! block, overlaps no occupied interval and does not start before `now`.
//! Leftover gaps shorter than the step are not packed with extra candidates.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::{OccupiedInterval, TimeRange};
use crate::schedule::WorkingHours;

/// Granularity used when the salon does not configure one.
pub const DEFAULT_STEP_MINUTES: u32 = 30;

/// A bookable interval of exactly the requested service duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Everything about a slot query except the schedule and occupied data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest {
    /// Calendar date the working hours are anchored to.
    pub date: NaiveDate,
    /// Fixed UTC offset of the salon's wall clock.
    pub offset: FixedOffset,
    pub duration_minutes: u32,
    pub step_minutes: u32,
    /// Candidates starting before this instant are never offered.
    pub now: DateTime<Utc>,
}

impl SlotRequest {
    /// A request in UTC with the default 30 minute step.
    pub fn new(date: NaiveDate, duration_minutes: u32, now: DateTime<Utc>) -> Self {
        Self {
            date,
            offset: Utc.fix(),
            duration_minutes,
            step_minutes: DEFAULT_STEP_MINUTES,
            now,
        }
    }

    pub fn with_step(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }
}

/// Why a candidate was or was not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Free,
    /// Overlaps an appointment or a time-off block.
    Occupied,
    /// Starts before `now`.
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub slot: Slot,
    pub verdict: Verdict,
}

/// Lazy walk over every step-aligned candidate in one working-hour block.
///
/// Finite and pure: building a new iterator from the same inputs yields the
/// same sequence.
#[derive(Debug, Clone)]
pub struct SlotCandidates<'a> {
    occupied: &'a [OccupiedInterval],
    cursor: DateTime<Utc>,
    day_end: DateTime<Utc>,
    duration: Duration,
    step: Duration,
    now: DateTime<Utc>,
    done: bool,
}

impl<'a> SlotCandidates<'a> {
    pub fn new(
        request: &SlotRequest,
        working_hours: Option<WorkingHours>,
        occupied: &'a [OccupiedInterval],
    ) -> Self {
        let duration = Duration::minutes(i64::from(request.duration_minutes));
        let step = Duration::minutes(i64::from(request.step_minutes));

        let (cursor, day_end, done) = match working_hours {
            Some(hours) if request.duration_minutes > 0 && request.step_minutes > 0 => {
                let (start, end) = hours.anchor(request.date, request.offset);
                (start, end, false)
            }
            // Not working that day, or a degenerate duration/step: nothing to offer.
            _ => (request.now, request.now, true),
        };

        Self {
            occupied,
            cursor,
            day_end,
            duration,
            step,
            now: request.now,
            done,
        }
    }

    /// Only the candidates that can be booked.
    pub fn free(self) -> impl Iterator<Item = Slot> + 'a {
        self.filter(|c| c.verdict == Verdict::Free).map(|c| c.slot)
    }

    fn verdict(&self, candidate: &TimeRange) -> Verdict {
        if self
            .occupied
            .iter()
            .any(|occ| candidate.overlaps(&occ.range))
        {
            Verdict::Occupied
        } else if candidate.start < self.now {
            Verdict::Past
        } else {
            Verdict::Free
        }
    }
}

impl Iterator for SlotCandidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.done {
            return None;
        }

        let end = match self.cursor.checked_add_signed(self.duration) {
            Some(end) if end <= self.day_end => end,
            _ => {
                self.done = true;
                return None;
            }
        };

        let range = TimeRange::new(self.cursor, end);
        let verdict = self.verdict(&range);

        match self.cursor.checked_add_signed(self.step) {
            Some(next) => self.cursor = next,
            None => self.done = true,
        }

        Some(Candidate {
            slot: Slot {
                start: range.start,
                end: range.end,
            },
            verdict,
        })
    }
}

/// Bookable slots for one working-hour block, in increasing start order.
///
/// Returns an empty list when `working_hours` is `None`, when the block ends
/// before it starts, or when the duration or step is zero.
pub fn available_slots(
    request: &SlotRequest,
    working_hours: Option<WorkingHours>,
    occupied: &[OccupiedInterval],
) -> Vec<Slot> {
    SlotCandidates::new(request, working_hours, occupied)
        .free()
        .collect()
}

/// Bookable slots for a day made of several working-hour blocks (split shifts).
///
/// Each block is evaluated independently against the same occupied set and the
/// per-block results are concatenated, blocks taken in start-time order. Slots
/// from different blocks are never merged or deduplicated.
pub fn day_slots(
    request: &SlotRequest,
    blocks: &[WorkingHours],
    occupied: &[OccupiedInterval],
) -> Vec<Slot> {
    let mut ordered = blocks.to_vec();
    ordered.sort_by_key(|hours| (hours.start, hours.end));

    ordered
        .into_iter()
        .flat_map(|hours| available_slots(request, Some(hours), occupied))
        .collect()
}
