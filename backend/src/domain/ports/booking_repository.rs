//! Port for booking persistence.

use async_trait::async_trait;

use crate::domain::{Booking, BookingId, Email, PaymentRecord};

use super::StoreError;

/// Storage of bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking.
    async fn insert(&self, booking: &Booking) -> Result<(), StoreError>;

    /// Fetch a booking by identifier.
    async fn find(&self, id: &BookingId) -> Result<Option<Booking>, StoreError>;

    /// Bookings made by one student.
    async fn list_for_student(&self, email: &Email) -> Result<Vec<Booking>, StoreError>;

    /// Delete a booking. Returns whether a record was removed.
    async fn delete(&self, id: &BookingId) -> Result<bool, StoreError>;

    /// Attach a payment and mark the booking paid.
    async fn record_payment(
        &self,
        id: &BookingId,
        payment: &PaymentRecord,
    ) -> Result<Option<Booking>, StoreError>;
}
