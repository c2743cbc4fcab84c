//! # salon-booking
//!
//! Availability and online booking for a salon, built on [`slot_engine`].
//!
//! The engine is pure; this crate supplies everything around it: the store
//! traits the data comes from, an in-memory implementation of every store,
//! salon settings, the clock, the availability service that queries a day for
//! one or many professionals, and the booking flows (online and staff) with
//! their write-time conflict check.
//!
//! ## Modules
//!
//! - [`model`] — Professionals, services, clients, appointments, time off
//! - [`store`] — Store traits consumed by the services
//! - [`memory`] — `InMemorySalon`, a snapshot-backed implementation of every store
//! - [`settings`] — `SalonSettings` loaded from TOML
//! - [`clock`] — Injectable source of the current instant
//! - [`availability`] — Slots per professional, per day and across the booking horizon
//! - [`booking`] — Online bookings and staff appointment changes
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod clock;
pub mod error;
pub mod memory;
pub mod model;
pub mod settings;
pub mod store;

pub use availability::{
    AvailabilityService, DayAvailability, ProfessionalFailure, ProfessionalSlots,
};
pub use booking::{BookingRequest, BookingService, StaffAppointmentRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AvailabilityError, BookingError, SettingsError, StoreError};
pub use memory::{InMemorySalon, SalonSnapshot};
pub use model::{
    Appointment, BookingOrigin, Client, PaymentMethod, Professional, ScheduleEntry, Service,
    TimeOffBlock,
};
pub use settings::SalonSettings;
pub use store::{BlockStore, BookingStore, ClientStore, ScheduleStore, ServiceCatalog};
