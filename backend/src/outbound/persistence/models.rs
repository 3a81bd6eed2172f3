//! Diesel row structs. Never exposed outside the persistence adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::StoreError;
use crate::domain::{
    Booking, BookingStatus, ClassListing, ClassStatus, Email, PaymentRecord, User, UserRole,
};

use super::error_mapping::invalid_row;
use super::schema::{bookings, classes, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub email: String,
    pub name: String,
    pub role: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub photo_url: Option<&'a str>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            email: Email::new(&row.email).map_err(|err| invalid_row("users", err))?,
            name: row.name,
            role: row
                .role
                .parse::<UserRole>()
                .map_err(|err| invalid_row("users", err))?,
            photo_url: row.photo_url,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClassRow {
    pub id: Uuid,
    pub instructor_email: String,
    pub instructor_name: String,
    pub title: String,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub seat_capacity: i32,
    pub enrolled: i32,
    pub status: String,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = classes)]
pub(crate) struct NewClassRow<'a> {
    pub id: Uuid,
    pub instructor_email: &'a str,
    pub instructor_name: &'a str,
    pub title: &'a str,
    pub image_url: Option<&'a str>,
    pub price_cents: i64,
    pub seat_capacity: i32,
    pub enrolled: i32,
    pub status: &'a str,
    pub feedback: Option<&'a str>,
}

/// Instructor edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = classes)]
pub(crate) struct ClassEditChanges<'a> {
    pub title: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub price_cents: Option<i64>,
    pub seat_capacity: Option<i32>,
}

impl ClassEditChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_url.is_none()
            && self.price_cents.is_none()
            && self.seat_capacity.is_none()
    }
}

impl TryFrom<ClassRow> for ClassListing {
    type Error = StoreError;

    fn try_from(row: ClassRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            instructor_email: Email::new(&row.instructor_email)
                .map_err(|err| invalid_row("classes", err))?,
            instructor_name: row.instructor_name,
            title: row.title,
            image_url: row.image_url,
            price_cents: u64::try_from(row.price_cents).map_err(|err| invalid_row("classes", err))?,
            seat_capacity: u32::try_from(row.seat_capacity)
                .map_err(|err| invalid_row("classes", err))?,
            enrolled: u32::try_from(row.enrolled).map_err(|err| invalid_row("classes", err))?,
            status: row
                .status
                .parse::<ClassStatus>()
                .map_err(|err| invalid_row("classes", err))?,
            feedback: row.feedback,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub class_id: Uuid,
    pub class_title: String,
    pub student_email: String,
    pub instructor_email: String,
    pub price_cents: i64,
    pub status: String,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub class_id: Uuid,
    pub class_title: &'a str,
    pub student_email: &'a str,
    pub instructor_email: &'a str,
    pub price_cents: i64,
    pub status: &'a str,
    pub transaction_id: Option<&'a str>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let payment = match (row.transaction_id, row.paid_at) {
            (Some(transaction_id), Some(paid_at)) => Some(PaymentRecord {
                transaction_id,
                paid_at,
            }),
            _ => None,
        };
        Ok(Self {
            id: row.id.into(),
            class_id: row.class_id.into(),
            class_title: row.class_title,
            student_email: Email::new(&row.student_email)
                .map_err(|err| invalid_row("bookings", err))?,
            instructor_email: Email::new(&row.instructor_email)
                .map_err(|err| invalid_row("bookings", err))?,
            price_cents: u64::try_from(row.price_cents)
                .map_err(|err| invalid_row("bookings", err))?,
            payment,
            status: BookingStatus::from_storage(&row.status),
        })
    }
}

/// Convert a domain count or amount into its signed column type.
pub(crate) fn to_column<T, U>(value: T, table: &'static str) -> Result<U, StoreError>
where
    U: TryFrom<T>,
    U::Error: std::fmt::Display,
{
    U::try_from(value).map_err(|err| invalid_row(table, err))
}
