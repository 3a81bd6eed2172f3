//! Domain primitives, services, and ports.
//!
//! Types here are transport agnostic: HTTP and persistence details live in
//! the inbound and outbound adapters.

pub mod auth;
pub mod booking;
pub mod class_listing;
pub mod enrollment;
pub mod error;
pub mod payment;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{AccessClaims, AccessToken, TokenError, TokenIssuer};
pub use self::booking::{Booking, BookingId, BookingStatus, PaymentRecord};
pub use self::class_listing::{
    ClassEdit, ClassId, ClassListing, ClassStatus, ClassValidationError, MAX_PRICE_CENTS,
    MAX_SEAT_CAPACITY, NewClassListing, StatusChange, price_cents_from, seat_capacity_from,
};
pub use self::enrollment::{EnrollmentOutcome, EnrollmentPolicy, EnrollmentService};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::payment::{ClientSecret, Currency, PaymentAmount, PaymentAmountError};
pub use self::trace_id::TraceId;
pub use self::user::{Email, User, UserRole, UserUpsert, UserValidationError};
