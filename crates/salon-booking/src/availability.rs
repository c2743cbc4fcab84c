//! Availability queries over the salon stores.
//!
//! For one professional and date: fetch that weekday's working-hour blocks and
//! the day's active appointments and time off, merge the latter into one
//! occupied set, then run the slot engine once per block. Batch queries repeat
//! this per professional and keep going when one of them fails.

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;
use slot_engine::schedule::{local_instant, weekday_index};
use slot_engine::{
    day_slots, occupied_intervals, Booking, OccupiedInterval, Slot, SlotRequest, TimeRange,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::AvailabilityError;
use crate::model::{Appointment, Service, TimeOffBlock};
use crate::settings::SalonSettings;
use crate::store::{BlockStore, BookingStore, ScheduleStore, ServiceCatalog};

pub type Result<T> = std::result::Result<T, AvailabilityError>;

/// Bookable slots of one professional on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionalSlots {
    pub professional_id: Uuid,
    pub slots: Vec<Slot>,
}

/// A professional whose availability could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionalFailure {
    pub professional_id: Uuid,
    pub reason: String,
}

/// Availability of several professionals on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub professionals: Vec<ProfessionalSlots>,
    pub failures: Vec<ProfessionalFailure>,
}

impl DayAvailability {
    /// `true` when no professional has a free slot.
    pub fn is_empty(&self) -> bool {
        self.professionals.iter().all(|p| p.slots.is_empty())
    }

    pub fn slots_of(&self, professional_id: Uuid) -> Option<&[Slot]> {
        self.professionals
            .iter()
            .find(|p| p.professional_id == professional_id)
            .map(|p| p.slots.as_slice())
    }
}

pub struct AvailabilityService<'a, S, C> {
    store: &'a S,
    clock: &'a C,
    settings: &'a SalonSettings,
}

impl<'a, S, C> AvailabilityService<'a, S, C>
where
    S: ServiceCatalog + ScheduleStore + BookingStore + BlockStore,
    C: Clock,
{
    pub fn new(store: &'a S, clock: &'a C, settings: &'a SalonSettings) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    /// `[local midnight, next local midnight)` of `date` as UTC instants.
    pub fn day_window(&self, date: NaiveDate) -> TimeRange {
        let offset = self.settings.utc_offset;
        let start = local_instant(date, NaiveTime::default(), offset);
        let end = date
            .checked_add_days(Days::new(1))
            .map(|next| local_instant(next, NaiveTime::default(), offset))
            .unwrap_or(start);
        TimeRange::new(start, end)
    }

    /// Appointments and time off that block `professional_id` on `date`.
    pub fn occupied_on(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<OccupiedInterval>> {
        let day = self.day_window(date);
        let appointments = self.store.active_appointments_on(professional_id, &day)?;
        let time_off = self.store.time_off_on(professional_id, &day)?;

        let bookings: Vec<Booking> = appointments.iter().map(Appointment::booking).collect();
        let blocks: Vec<TimeRange> = time_off.iter().map(TimeOffBlock::range).collect();
        Ok(occupied_intervals(&bookings, &blocks))
    }

    /// Bookable slots of one professional for `service_id` on `date`.
    ///
    /// An inactive professional or a day without working hours yields an empty
    /// list.
    pub fn slots_for(
        &self,
        professional_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Slot>> {
        let service = self.bookable_service(service_id)?;
        self.professional_slots(professional_id, &service, date)
    }

    /// Slots of several professionals on `date`. An empty `professionals` list
    /// queries every active professional.
    ///
    /// Only an unknown service fails the whole query; any other failure is
    /// recorded per professional in [`DayAvailability::failures`].
    pub fn slots_for_professionals(
        &self,
        service_id: Uuid,
        date: NaiveDate,
        professionals: &[Uuid],
    ) -> Result<DayAvailability> {
        let service = self.bookable_service(service_id)?;
        let ids = self.resolve_professionals(professionals)?;
        Ok(self.day_availability(&service, date, &ids))
    }

    /// Availability for every date customers may currently book.
    pub fn slots_for_horizon(
        &self,
        service_id: Uuid,
        professionals: &[Uuid],
    ) -> Result<Vec<DayAvailability>> {
        let service = self.bookable_service(service_id)?;
        let ids = self.resolve_professionals(professionals)?;
        Ok(self
            .booking_dates()
            .into_iter()
            .map(|date| self.day_availability(&service, date, &ids))
            .collect())
    }

    /// Today on the salon's wall clock followed by the rest of the booking
    /// horizon.
    pub fn booking_dates(&self) -> Vec<NaiveDate> {
        let today = self.clock.today(self.settings.utc_offset);
        today
            .iter_days()
            .take(self.settings.booking_horizon_days as usize)
            .collect()
    }

    fn day_availability(
        &self,
        service: &Service,
        date: NaiveDate,
        ids: &[Uuid],
    ) -> DayAvailability {
        let mut availability = DayAvailability {
            date,
            professionals: Vec::with_capacity(ids.len()),
            failures: Vec::new(),
        };

        for &professional_id in ids {
            match self.professional_slots(professional_id, service, date) {
                Ok(slots) => availability.professionals.push(ProfessionalSlots {
                    professional_id,
                    slots,
                }),
                Err(err) => {
                    warn!(
                        %professional_id,
                        %date,
                        error = %err,
                        "availability failed for professional"
                    );
                    availability.failures.push(ProfessionalFailure {
                        professional_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        availability
    }

    fn professional_slots(
        &self,
        professional_id: Uuid,
        service: &Service,
        date: NaiveDate,
    ) -> Result<Vec<Slot>> {
        let professional = self
            .store
            .professional(professional_id)?
            .ok_or(AvailabilityError::UnknownProfessional(professional_id))?;
        if !professional.active {
            debug!(%professional_id, "professional inactive, no slots");
            return Ok(Vec::new());
        }

        let blocks = self
            .store
            .working_hours(professional_id, weekday_index(date))?;
        if blocks.is_empty() {
            debug!(%professional_id, %date, "no working hours");
            return Ok(Vec::new());
        }

        let occupied = self.occupied_on(professional_id, date)?;
        let request = SlotRequest::new(date, service.duration_minutes, self.clock.now())
            .with_step(self.settings.slot_step_minutes)
            .with_offset(self.settings.utc_offset);

        let slots = day_slots(&request, &blocks, &occupied);
        debug!(
            %professional_id,
            %date,
            blocks = blocks.len(),
            occupied = occupied.len(),
            slots = slots.len(),
            "computed slots"
        );
        Ok(slots)
    }

    fn bookable_service(&self, service_id: Uuid) -> Result<Service> {
        match self.store.service(service_id)? {
            Some(service) if service.active => Ok(service),
            _ => Err(AvailabilityError::UnknownService(service_id)),
        }
    }

    fn resolve_professionals(&self, professionals: &[Uuid]) -> Result<Vec<Uuid>> {
        if !professionals.is_empty() {
            return Ok(professionals.to_vec());
        }
        Ok(self
            .store
            .active_professionals()?
            .into_iter()
            .map(|p| p.id)
            .collect())
    }
}
