//! Store traits the availability and booking services read from.
//!
//! Day queries take the day as a [`TimeRange`] `[day_start, next_day_start)`
//! already resolved in the salon's offset, so stores never deal with local
//! time.

use slot_engine::{AppointmentStatus, TimeRange, WorkingHours};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Appointment, Client, Professional, Service, TimeOffBlock};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Service and professional lookups.
pub trait ServiceCatalog {
    fn service(&self, id: Uuid) -> Result<Option<Service>>;

    fn professional(&self, id: Uuid) -> Result<Option<Professional>>;

    /// Active professionals, ordered by name.
    fn active_professionals(&self) -> Result<Vec<Professional>>;
}

/// Weekly recurring working hours.
pub trait ScheduleStore {
    /// Active working-hour blocks of `professional_id` on `weekday`
    /// (0 = Sunday), in no particular order.
    fn working_hours(&self, professional_id: Uuid, weekday: u8) -> Result<Vec<WorkingHours>>;
}

/// Appointments.
pub trait BookingStore {
    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// Pending or confirmed appointments of `professional_id` whose start falls
    /// inside `day`.
    fn active_appointments_on(&self, professional_id: Uuid, day: &TimeRange)
        -> Result<Vec<Appointment>>;

    /// Every appointment of `professional_id` overlapping `range`, any status.
    fn appointments_overlapping(
        &self,
        professional_id: Uuid,
        range: &TimeRange,
    ) -> Result<Vec<Appointment>>;

    /// Persist a new appointment.
    ///
    /// Implementations must reject an occupying appointment that overlaps an
    /// active one of the same professional with [`StoreError::Conflict`],
    /// atomically with the insert.
    fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment>;

    /// Replace the stored appointment with the same id.
    ///
    /// The same atomic conflict check as [`insert_appointment`] applies, with
    /// the appointment's own previous range ignored. Fails with
    /// [`StoreError::AppointmentNotFound`] for an unknown id.
    ///
    /// [`insert_appointment`]: BookingStore::insert_appointment
    fn update_appointment(&self, appointment: Appointment) -> Result<Appointment>;

    /// Set the status of an appointment. Moving a cancelled, completed or
    /// no-show appointment back to an occupying status is conflict-checked.
    fn update_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment>;
}

/// Ad hoc time off.
pub trait BlockStore {
    /// Time-off blocks of `professional_id` whose start falls inside `day`.
    fn time_off_on(&self, professional_id: Uuid, day: &TimeRange) -> Result<Vec<TimeOffBlock>>;
}

/// Client records keyed by phone.
pub trait ClientStore {
    fn client_by_phone(&self, phone: &str) -> Result<Option<Client>>;

    /// Insert a client, returning the stored record. If a client with the same
    /// phone already exists, that record is returned instead.
    fn insert_client(&self, client: Client) -> Result<Client>;
}
