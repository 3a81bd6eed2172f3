//! PostgreSQL-backed [`BookingRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BookingRepository, StoreError};
use crate::domain::{Booking, BookingId, BookingStatus, Email, PaymentRecord};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookingRow, NewBookingRow, to_column};
use super::pool::DbPool;
use super::schema::bookings;

/// Diesel implementation of the booking store.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), StoreError> {
        let row = NewBookingRow {
            id: *booking.id.as_uuid(),
            class_id: *booking.class_id.as_uuid(),
            class_title: &booking.class_title,
            student_email: booking.student_email.as_ref(),
            instructor_email: booking.instructor_email.as_ref(),
            price_cents: to_column(booking.price_cents, "bookings")?,
            status: booking.status.as_str(),
            transaction_id: booking
                .payment
                .as_ref()
                .map(|payment| payment.transaction_id.as_str()),
            paid_at: booking.payment.as_ref().map(|payment| payment.paid_at),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(bookings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, id: &BookingId) -> Result<Option<Booking>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        bookings::table
            .filter(bookings::id.eq(id.as_uuid()))
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn list_for_student(&self, email: &Email) -> Result<Vec<Booking>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        bookings::table
            .filter(bookings::student_email.eq(email.as_ref()))
            .order(bookings::created_at.desc())
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(bookings::table.filter(bookings::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn record_payment(
        &self,
        id: &BookingId,
        payment: &PaymentRecord,
    ) -> Result<Option<Booking>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(bookings::table.filter(bookings::id.eq(id.as_uuid())))
            .set((
                bookings::status.eq(BookingStatus::Paid.as_str()),
                bookings::transaction_id.eq(Some(payment.transaction_id.as_str())),
                bookings::paid_at.eq(Some(payment.paid_at)),
            ))
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(Booking::try_from)
            .transpose()
    }
}
