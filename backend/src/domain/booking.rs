//! Student bookings of class listings and their payment state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::class_listing::{ClassId, ClassListing};
use super::user::Email;

/// Booking identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a path segment into an identifier.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.trim()).map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BookingId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Booking lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Booked,
    Paid,
}

impl BookingStatus {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Paid => "paid",
        }
    }

    /// Parse the storage representation, treating unknown values as booked.
    pub fn from_storage(raw: &str) -> Self {
        match raw {
            "paid" => Self::Paid,
            _ => Self::Booked,
        }
    }
}

/// Completed payment attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub transaction_id: String,
    pub paid_at: DateTime<Utc>,
}

/// Stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub class_id: ClassId,
    pub class_title: String,
    #[schema(value_type = String)]
    pub student_email: Email,
    #[schema(value_type = String)]
    pub instructor_email: Email,
    pub price_cents: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
    pub status: BookingStatus,
}

impl Booking {
    /// New unpaid booking snapshotting the listing's title and price.
    pub fn for_listing(id: BookingId, listing: &ClassListing, student_email: Email) -> Self {
        Self {
            id,
            class_id: listing.id,
            class_title: listing.title.clone(),
            student_email,
            instructor_email: listing.instructor_email.clone(),
            price_cents: listing.price_cents,
            payment: None,
            status: BookingStatus::Booked,
        }
    }

    /// Record a payment and flip the status.
    pub fn mark_paid(&mut self, payment: PaymentRecord) {
        self.payment = Some(payment);
        self.status = BookingStatus::Paid;
    }
}
