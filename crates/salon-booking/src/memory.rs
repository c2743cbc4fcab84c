//! In-memory implementation of every store, backed by a JSON snapshot.
//!
//! All state lives behind one `RwLock`. Appointment inserts run the conflict
//! check and the push under the same write lock, so two concurrent bookings
//! for the same time cannot both succeed.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::{is_free, AppointmentStatus, Booking, TimeRange, WorkingHours};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Appointment, Client, Professional, ScheduleEntry, Service, TimeOffBlock};
use crate::store::{BlockStore, BookingStore, ClientStore, Result, ScheduleStore, ServiceCatalog};

/// Serializable contents of a salon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalonSnapshot {
    pub professionals: Vec<Professional>,
    pub services: Vec<Service>,
    pub clients: Vec<Client>,
    pub schedules: Vec<ScheduleEntry>,
    pub appointments: Vec<Appointment>,
    pub time_off: Vec<TimeOffBlock>,
}

#[derive(Debug, Default)]
pub struct InMemorySalon {
    state: RwLock<SalonSnapshot>,
}

impl InMemorySalon {
    pub fn new(snapshot: SalonSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SalonSnapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// A copy of the current contents.
    pub fn snapshot(&self) -> Result<SalonSnapshot> {
        Ok(self.read()?.clone())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.read()?)?)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, SalonSnapshot>> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, SalonSnapshot>> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }
}

fn starts_within(start: &DateTime<Utc>, day: &TimeRange) -> bool {
    *start >= day.start && *start < day.end
}

impl ServiceCatalog for InMemorySalon {
    fn service(&self, id: Uuid) -> Result<Option<Service>> {
        Ok(self.read()?.services.iter().find(|s| s.id == id).cloned())
    }

    fn professional(&self, id: Uuid) -> Result<Option<Professional>> {
        Ok(self
            .read()?
            .professionals
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    fn active_professionals(&self) -> Result<Vec<Professional>> {
        let mut active: Vec<Professional> = self
            .read()?
            .professionals
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }
}

impl ScheduleStore for InMemorySalon {
    fn working_hours(&self, professional_id: Uuid, weekday: u8) -> Result<Vec<WorkingHours>> {
        Ok(self
            .read()?
            .schedules
            .iter()
            .filter(|e| {
                e.professional_id == professional_id && e.block.active && e.block.weekday == weekday
            })
            .map(|e| e.block.hours)
            .collect())
    }
}

impl BookingStore for InMemorySalon {
    fn appointment(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self
            .read()?
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    fn active_appointments_on(
        &self,
        professional_id: Uuid,
        day: &TimeRange,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .read()?
            .appointments
            .iter()
            .filter(|a| {
                a.professional_id == professional_id
                    && a.status.occupies_time()
                    && starts_within(&a.start, day)
            })
            .cloned()
            .collect())
    }

    fn appointments_overlapping(
        &self,
        professional_id: Uuid,
        range: &TimeRange,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .read()?
            .appointments
            .iter()
            .filter(|a| a.professional_id == professional_id && a.range().overlaps(range))
            .cloned()
            .collect())
    }

    fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment> {
        let mut state = self.write()?;
        ensure_free(&state, &appointment)?;
        state.appointments.push(appointment.clone());
        Ok(appointment)
    }

    fn update_appointment(&self, appointment: Appointment) -> Result<Appointment> {
        let mut state = self.write()?;
        let index = position_of(&state, appointment.id)?;
        ensure_free(&state, &appointment)?;
        state.appointments[index] = appointment.clone();
        Ok(appointment)
    }

    fn update_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment> {
        let mut state = self.write()?;
        let index = position_of(&state, id)?;

        let mut updated = state.appointments[index].clone();
        let was_occupying = updated.status.occupies_time();
        updated.status = status;
        if !was_occupying {
            ensure_free(&state, &updated)?;
        }

        state.appointments[index] = updated.clone();
        Ok(updated)
    }
}

fn position_of(state: &SalonSnapshot, id: Uuid) -> Result<usize> {
    state
        .appointments
        .iter()
        .position(|a| a.id == id)
        .ok_or(StoreError::AppointmentNotFound(id))
}

/// Reject `appointment` if it occupies time already taken by another active
/// appointment of the same professional. Its own stored copy is ignored.
fn ensure_free(state: &SalonSnapshot, appointment: &Appointment) -> Result<()> {
    if !appointment.status.occupies_time() {
        return Ok(());
    }
    let others: Vec<Booking> = state
        .appointments
        .iter()
        .filter(|a| a.professional_id == appointment.professional_id && a.id != appointment.id)
        .map(Appointment::booking)
        .collect();
    if is_free(&appointment.range(), &others) {
        Ok(())
    } else {
        Err(StoreError::Conflict {
            professional_id: appointment.professional_id,
        })
    }
}

impl BlockStore for InMemorySalon {
    fn time_off_on(&self, professional_id: Uuid, day: &TimeRange) -> Result<Vec<TimeOffBlock>> {
        Ok(self
            .read()?
            .time_off
            .iter()
            .filter(|b| b.professional_id == professional_id && starts_within(&b.start, day))
            .cloned()
            .collect())
    }
}

impl ClientStore for InMemorySalon {
    fn client_by_phone(&self, phone: &str) -> Result<Option<Client>> {
        Ok(self
            .read()?
            .clients
            .iter()
            .find(|c| c.phone == phone)
            .cloned())
    }

    fn insert_client(&self, client: Client) -> Result<Client> {
        let mut state = self.write()?;
        if let Some(existing) = state.clients.iter().find(|c| c.phone == client.phone) {
            return Ok(existing.clone());
        }
        state.clients.push(client.clone());
        Ok(client)
    }
}
