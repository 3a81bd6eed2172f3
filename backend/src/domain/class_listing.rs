//! Class listings published by instructors.
//!
//! `seat_capacity` counts the seats still open; `enrolled` counts confirmed
//! enrollments. Only the enrollment path moves a seat from one to the other,
//! so their sum is fixed once a listing exists (instructor edits aside).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::Email;

/// Validation errors for class listing input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("instructor name must not be empty")]
    EmptyInstructorName,
    #[error("seat capacity must not be negative")]
    NegativeSeats,
    #[error("seat capacity must not exceed {}", MAX_SEAT_CAPACITY)]
    TooManySeats,
    #[error("price must not exceed {} cents", MAX_PRICE_CENTS)]
    PriceTooHigh,
    #[error("class id must be a valid UUID")]
    InvalidId,
    #[error("unknown class status `{0}`")]
    UnknownStatus(String),
}

/// Largest seat count a listing may hold.
pub const MAX_SEAT_CAPACITY: u32 = i32::MAX.unsigned_abs();
/// Largest price a listing may carry.
pub const MAX_PRICE_CENTS: u64 = i64::MAX.unsigned_abs();

/// Validate a requested seat count.
pub fn seat_capacity_from(raw: i64) -> Result<u32, ClassValidationError> {
    let seats = u32::try_from(raw).map_err(|_| {
        if raw < 0 {
            ClassValidationError::NegativeSeats
        } else {
            ClassValidationError::TooManySeats
        }
    })?;
    if seats > MAX_SEAT_CAPACITY {
        return Err(ClassValidationError::TooManySeats);
    }
    Ok(seats)
}

/// Validate a requested price in cents.
pub fn price_cents_from(raw: u64) -> Result<u64, ClassValidationError> {
    if raw > MAX_PRICE_CENTS {
        return Err(ClassValidationError::PriceTooHigh);
    }
    Ok(raw)
}

/// Class listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct ClassId(Uuid);

impl ClassId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a path segment into an identifier.
    pub fn parse(raw: &str) -> Result<Self, ClassValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| ClassValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ClassId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Moderation state of a listing. Only approved listings are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl ClassStatus {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl std::str::FromStr for ClassStatus {
    type Err = ClassValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            other => Err(ClassValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Stored class listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassListing {
    pub id: ClassId,
    #[schema(value_type = String, example = "sensei@example.com")]
    pub instructor_email: Email,
    pub instructor_name: String,
    #[schema(example = "Conversational Japanese")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub price_cents: u64,
    pub seat_capacity: u32,
    pub enrolled: u32,
    pub status: ClassStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Validated input for a new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClassListing {
    pub instructor_email: Email,
    pub instructor_name: String,
    pub title: String,
    pub image_url: Option<String>,
    pub price_cents: u64,
    pub seat_capacity: u32,
}

impl NewClassListing {
    /// Validate the listing fields.
    pub fn new(
        instructor_email: Email,
        instructor_name: impl Into<String>,
        title: impl Into<String>,
        image_url: Option<String>,
        price_cents: u64,
        seat_capacity: i64,
    ) -> Result<Self, ClassValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(ClassValidationError::EmptyTitle);
        }
        let instructor_name = instructor_name.into().trim().to_owned();
        if instructor_name.is_empty() {
            return Err(ClassValidationError::EmptyInstructorName);
        }
        Ok(Self {
            instructor_email,
            instructor_name,
            title,
            image_url,
            price_cents: price_cents_from(price_cents)?,
            seat_capacity: seat_capacity_from(seat_capacity)?,
        })
    }

    /// Materialise a pending listing with no enrollments.
    pub fn into_listing(self, id: ClassId) -> ClassListing {
        ClassListing {
            id,
            instructor_email: self.instructor_email,
            instructor_name: self.instructor_name,
            title: self.title,
            image_url: self.image_url,
            price_cents: self.price_cents,
            seat_capacity: self.seat_capacity,
            enrolled: 0,
            status: ClassStatus::Pending,
            feedback: None,
        }
    }
}

/// Instructor edits. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassEdit {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<u64>,
    pub seat_capacity: Option<u32>,
}

impl ClassEdit {
    /// Apply the edit in place.
    pub fn apply_to(&self, listing: &mut ClassListing) {
        if let Some(title) = &self.title {
            listing.title.clone_from(title);
        }
        if let Some(image_url) = &self.image_url {
            listing.image_url = Some(image_url.clone());
        }
        if let Some(price) = self.price_cents {
            listing.price_cents = price;
        }
        if let Some(seats) = self.seat_capacity {
            listing.seat_capacity = seats;
        }
    }
}

/// Admin moderation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ClassStatus,
    pub feedback: Option<String>,
}
