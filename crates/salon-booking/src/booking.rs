//! Booking creation and appointment changes.
//!
//! Customers book online; staff create, reschedule and change the status of
//! appointments. The slot list a customer picked from may be stale by the time
//! they submit, so every write re-checks the range against the professional's
//! live appointments before persisting, and the store checks once more
//! atomically with the write. Either check failing yields
//! [`BookingError::SlotUnavailable`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::{find_conflicts, AppointmentStatus, Booking, Conflict, TimeRange};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::BookingError;
use crate::model::{Appointment, BookingOrigin, Client, PaymentMethod, Professional, Service};
use crate::settings::SalonSettings;
use crate::store::{BookingStore, ClientStore, ServiceCatalog};

pub type Result<T> = std::result::Result<T, BookingError>;

/// A customer's booking submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub client_name: String,
    pub client_phone: String,
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub start: DateTime<Utc>,
    /// End proposed by the client. Only checked against the service
    /// duration; the stored end is always derived.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An appointment entered by salon staff for an existing client.
///
/// Also used to reschedule: every field replaces the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAppointmentRequest {
    #[serde(default)]
    pub client_id: Option<Uuid>,
    pub service_id: Uuid,
    pub professional_id: Uuid,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

pub struct BookingService<'a, S, C> {
    store: &'a S,
    clock: &'a C,
    settings: &'a SalonSettings,
}

impl<'a, S, C> BookingService<'a, S, C>
where
    S: ServiceCatalog + BookingStore + ClientStore,
    C: Clock,
{
    pub fn new(store: &'a S, clock: &'a C, settings: &'a SalonSettings) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    /// Active appointments of `professional_id` that overlap `range`.
    pub fn conflicts(&self, professional_id: Uuid, range: &TimeRange) -> Result<Vec<Conflict>> {
        self.conflicts_excluding(professional_id, range, None)
    }

    /// Like [`conflicts`](Self::conflicts), ignoring the appointment `exclude`.
    pub fn conflicts_excluding(
        &self,
        professional_id: Uuid,
        range: &TimeRange,
        exclude: Option<Uuid>,
    ) -> Result<Vec<Conflict>> {
        let candidates: Vec<Booking> = self
            .store
            .appointments_overlapping(professional_id, range)?
            .iter()
            .filter(|a| Some(a.id) != exclude)
            .map(Appointment::booking)
            .collect();
        Ok(find_conflicts(range, &candidates))
    }

    /// Validate, conflict-check and persist an online booking.
    ///
    /// The appointment is stored as pending with the service's current base
    /// price captured on it.
    pub fn book(&self, request: BookingRequest) -> Result<Appointment> {
        let client_name = request.client_name.trim().to_string();
        let client_phone = request.client_phone.trim().to_string();
        self.validate_client(&client_name, &client_phone)?;

        let service = self.bookable_service(request.service_id)?;
        self.bookable_professional(request.professional_id)?;

        let range = booking_range(request.start, request.end, &service)?;
        self.ensure_free(request.professional_id, &range, None)?;

        let client = self.resolve_client(&client_name, &client_phone)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_id: Some(client.id),
            professional_id: request.professional_id,
            service_id: Some(service.id),
            start: range.start,
            end: range.end,
            status: AppointmentStatus::Pending,
            price_cents: Some(service.base_price_cents()),
            payment_method: PaymentMethod::Cash,
            origin: BookingOrigin::Online,
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            created_at: Some(self.clock.now()),
        };

        let stored = self.store.insert_appointment(appointment)?;
        info!(
            appointment_id = %stored.id,
            professional_id = %stored.professional_id,
            start = %stored.start,
            "online booking created"
        );
        Ok(stored)
    }

    /// Create an appointment on behalf of the salon.
    ///
    /// The price is captured for the chosen payment method and the origin is
    /// recorded as staff.
    pub fn create_appointment(&self, request: StaffAppointmentRequest) -> Result<Appointment> {
        let service = self.bookable_service(request.service_id)?;
        self.bookable_professional(request.professional_id)?;

        let range = booking_range(request.start, None, &service)?;
        self.ensure_free(request.professional_id, &range, None)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_id: request.client_id,
            professional_id: request.professional_id,
            service_id: Some(service.id),
            start: range.start,
            end: range.end,
            status: AppointmentStatus::Pending,
            price_cents: Some(service.price_for(request.payment_method)),
            payment_method: request.payment_method,
            origin: BookingOrigin::Staff,
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            created_at: Some(self.clock.now()),
        };

        let stored = self.store.insert_appointment(appointment)?;
        info!(
            appointment_id = %stored.id,
            professional_id = %stored.professional_id,
            start = %stored.start,
            "staff appointment created"
        );
        Ok(stored)
    }

    /// Move or otherwise edit an existing appointment.
    ///
    /// The end and price are recomputed from the service and payment method.
    /// The appointment's current range never conflicts with its new one.
    pub fn reschedule(&self, id: Uuid, request: StaffAppointmentRequest) -> Result<Appointment> {
        let existing = self
            .store
            .appointment(id)?
            .ok_or(BookingError::UnknownAppointment(id))?;
        let service = self.bookable_service(request.service_id)?;
        self.bookable_professional(request.professional_id)?;

        let range = booking_range(request.start, None, &service)?;
        self.ensure_free(request.professional_id, &range, Some(id))?;

        let updated = Appointment {
            client_id: request.client_id,
            professional_id: request.professional_id,
            service_id: Some(service.id),
            start: range.start,
            end: range.end,
            price_cents: Some(service.price_for(request.payment_method)),
            payment_method: request.payment_method,
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            ..existing
        };

        let stored = self.store.update_appointment(updated)?;
        info!(
            appointment_id = %stored.id,
            professional_id = %stored.professional_id,
            start = %stored.start,
            "appointment rescheduled"
        );
        Ok(stored)
    }

    /// Change an appointment's status. Cancelling or marking a no-show frees
    /// its time for new bookings.
    pub fn update_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment> {
        let stored = self.store.update_status(id, status)?;
        info!(appointment_id = %id, %status, "appointment status changed");
        Ok(stored)
    }

    fn ensure_free(
        &self,
        professional_id: Uuid,
        range: &TimeRange,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        let conflicts = self.conflicts_excluding(professional_id, range, exclude)?;
        if conflicts.is_empty() {
            return Ok(());
        }
        warn!(
            %professional_id,
            start = %range.start,
            conflicts = conflicts.len(),
            "requested time no longer available"
        );
        Err(BookingError::SlotUnavailable)
    }

    fn validate_client(&self, name: &str, phone: &str) -> Result<()> {
        if name.chars().count() < self.settings.min_client_name_len {
            return Err(BookingError::Validation {
                field: "client_name",
                message: format!(
                    "Name must have at least {} characters",
                    self.settings.min_client_name_len
                ),
            });
        }
        if phone.chars().count() < self.settings.min_phone_len {
            return Err(BookingError::Validation {
                field: "client_phone",
                message: format!(
                    "Phone must have at least {} characters",
                    self.settings.min_phone_len
                ),
            });
        }
        Ok(())
    }

    fn bookable_service(&self, service_id: Uuid) -> Result<Service> {
        match self.store.service(service_id)? {
            Some(service) if service.active => Ok(service),
            _ => Err(BookingError::UnknownService(service_id)),
        }
    }

    fn bookable_professional(&self, professional_id: Uuid) -> Result<Professional> {
        match self.store.professional(professional_id)? {
            Some(professional) if professional.active => Ok(professional),
            _ => Err(BookingError::UnknownProfessional(professional_id)),
        }
    }

    fn resolve_client(&self, name: &str, phone: &str) -> Result<Client> {
        if let Some(existing) = self.store.client_by_phone(phone)? {
            debug!(client_id = %existing.id, "matched existing client by phone");
            return Ok(existing);
        }
        let client = self.store.insert_client(Client {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
        })?;
        debug!(client_id = %client.id, "created client");
        Ok(client)
    }
}

/// The stored range: `start + service duration`. A client-supplied end that
/// disagrees is rejected.
fn booking_range(
    start: DateTime<Utc>,
    proposed_end: Option<DateTime<Utc>>,
    service: &Service,
) -> Result<TimeRange> {
    if service.duration_minutes == 0 {
        return Err(BookingError::Validation {
            field: "service_id",
            message: "Service has no duration".to_string(),
        });
    }
    let end = start + Duration::minutes(i64::from(service.duration_minutes));
    if let Some(proposed) = proposed_end {
        if proposed != end {
            return Err(BookingError::Validation {
                field: "end",
                message: format!(
                    "End must be {} for a {} minute service",
                    end.to_rfc3339(),
                    service.duration_minutes
                ),
            });
        }
    }
    Ok(TimeRange::new(start, end))
}
