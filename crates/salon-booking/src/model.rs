//! Salon records as stored and exchanged in snapshots.
//!
//! Prices are integer minor units (cents).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::{AppointmentStatus, Booking, TimeRange, WorkingHourBlock};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: u32,
    /// Base price, charged for cash payments.
    pub cash_price_cents: u64,
    /// Price for wallet payments.
    #[serde(default)]
    pub electronic_price_cents: u64,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Service {
    /// The price captured on new online bookings.
    pub fn base_price_cents(&self) -> u64 {
        self.cash_price_cents
    }

    /// Price charged for `method`. Only wallet payments use the electronic
    /// price; transfers are charged like cash.
    pub fn price_for(&self, method: PaymentMethod) -> u64 {
        match method {
            PaymentMethod::Wallet => self.electronic_price_cents,
            PaymentMethod::Cash | PaymentMethod::Transfer => self.cash_price_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A weekly working-hour block owned by one professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub professional_id: Uuid,
    #[serde(flatten)]
    pub block: WorkingHourBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Wallet,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingOrigin {
    /// Self-booked by the customer.
    Online,
    /// Entered by salon staff.
    #[default]
    Staff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    pub professional_id: Uuid,
    #[serde(default)]
    pub service_id: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Price captured when the appointment was booked.
    #[serde(default)]
    pub price_cents: Option<u64>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub origin: BookingOrigin,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Appointment {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }

    pub fn booking(&self) -> Booking {
        Booking::new(self.range(), self.status)
    }
}

/// Explicit time off for a professional. Always occupies its range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffBlock {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl TimeOffBlock {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}
