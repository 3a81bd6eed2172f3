//! PostgreSQL-backed [`ClassRepository`].
//!
//! Seat claims run as one conditional `UPDATE ... RETURNING`: Postgres
//! re-checks the `seat_capacity` predicate after taking the row lock, so
//! concurrent claims serialise on the row and never oversell it.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ClassFilter, ClassRepository, SeatClaim, StoreError};
use crate::domain::{ClassEdit, ClassId, ClassListing, ClassStatus, StatusChange};

use super::error_mapping::{invalid_row, map_diesel_error, map_pool_error};
use super::models::{ClassEditChanges, ClassRow, NewClassRow, to_column};
use super::pool::DbPool;
use super::schema::classes;

/// Diesel implementation of the class listing store.
#[derive(Clone)]
pub struct DieselClassRepository {
    pool: DbPool,
}

impl DieselClassRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_listings(rows: Vec<ClassRow>) -> Result<Vec<ClassListing>, StoreError> {
    rows.into_iter().map(ClassListing::try_from).collect()
}

fn counts(seat_capacity: i32, enrolled: i32) -> Result<(u32, u32), StoreError> {
    Ok((
        u32::try_from(seat_capacity).map_err(|err| invalid_row("classes", err))?,
        u32::try_from(enrolled).map_err(|err| invalid_row("classes", err))?,
    ))
}

#[async_trait]
impl ClassRepository for DieselClassRepository {
    async fn insert(&self, listing: &ClassListing) -> Result<(), StoreError> {
        let row = NewClassRow {
            id: *listing.id.as_uuid(),
            instructor_email: listing.instructor_email.as_ref(),
            instructor_name: &listing.instructor_name,
            title: &listing.title,
            image_url: listing.image_url.as_deref(),
            price_cents: to_column(listing.price_cents, "classes")?,
            seat_capacity: to_column(listing.seat_capacity, "classes")?,
            enrolled: to_column(listing.enrolled, "classes")?,
            status: listing.status.as_str(),
            feedback: listing.feedback.as_deref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(classes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, id: &ClassId) -> Result<Option<ClassListing>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        classes::table
            .filter(classes::id.eq(id.as_uuid()))
            .select(ClassRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(ClassListing::try_from)
            .transpose()
    }

    async fn list(&self, filter: ClassFilter) -> Result<Vec<ClassListing>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = classes::table
            .select(ClassRow::as_select())
            .order(classes::created_at.desc())
            .into_boxed();
        query = match &filter {
            ClassFilter::All => query,
            ClassFilter::Approved => {
                query.filter(classes::status.eq(ClassStatus::Approved.as_str()))
            }
            ClassFilter::Instructor(email) => {
                query.filter(classes::instructor_email.eq(email.as_ref().to_owned()))
            }
        };
        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        to_listings(rows)
    }

    async fn popular(&self, limit: u32) -> Result<Vec<ClassListing>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = classes::table
            .filter(classes::status.eq(ClassStatus::Approved.as_str()))
            .order((classes::enrolled.desc(), classes::created_at.desc()))
            .limit(i64::from(limit))
            .select(ClassRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_listings(rows)
    }

    async fn update_details(
        &self,
        id: &ClassId,
        edit: &ClassEdit,
    ) -> Result<Option<ClassListing>, StoreError> {
        let changes = ClassEditChanges {
            title: edit.title.as_deref(),
            image_url: edit.image_url.as_deref(),
            price_cents: edit
                .price_cents
                .map(|price| to_column(price, "classes"))
                .transpose()?,
            seat_capacity: edit
                .seat_capacity
                .map(|seats| to_column(seats, "classes"))
                .transpose()?,
        };
        if changes.is_empty() {
            return self.find(id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(classes::table.filter(classes::id.eq(id.as_uuid())))
            .set(&changes)
            .returning(ClassRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(ClassListing::try_from)
            .transpose()
    }

    async fn set_status(
        &self,
        id: &ClassId,
        change: &StatusChange,
    ) -> Result<Option<ClassListing>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(classes::table.filter(classes::id.eq(id.as_uuid())))
            .set((
                classes::status.eq(change.status.as_str()),
                classes::feedback.eq(change.feedback.as_deref()),
            ))
            .returning(ClassRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(ClassListing::try_from)
            .transpose()
    }

    async fn try_claim_seat(
        &self,
        id: &ClassId,
        full_threshold: u32,
    ) -> Result<SeatClaim, StoreError> {
        // Thresholds beyond i32 can never be exceeded by a stored capacity.
        let threshold = i32::try_from(full_threshold).unwrap_or(i32::MAX);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let claimed: Option<(i32, i32)> = diesel::update(
            classes::table
                .filter(classes::id.eq(id.as_uuid()))
                .filter(classes::seat_capacity.gt(threshold)),
        )
        .set((
            classes::seat_capacity.eq(classes::seat_capacity - 1),
            classes::enrolled.eq(classes::enrolled + 1),
        ))
        .returning((classes::seat_capacity, classes::enrolled))
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some((seat_capacity, enrolled)) = claimed {
            let (seat_capacity, enrolled) = counts(seat_capacity, enrolled)?;
            return Ok(SeatClaim::Claimed {
                seat_capacity,
                enrolled,
            });
        }

        // Zero rows: either the class is missing or the predicate failed.
        let current: Option<(i32, i32)> = classes::table
            .filter(classes::id.eq(id.as_uuid()))
            .select((classes::seat_capacity, classes::enrolled))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match current {
            Some((seat_capacity, enrolled)) => {
                let (seat_capacity, enrolled) = counts(seat_capacity, enrolled)?;
                debug!(%id, seat_capacity, "seat claim rejected");
                Ok(SeatClaim::Full {
                    seat_capacity,
                    enrolled,
                })
            }
            None => Ok(SeatClaim::NotFound),
        }
    }
}
