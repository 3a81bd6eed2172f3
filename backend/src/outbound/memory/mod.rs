//! Process-local store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. State is lost on restart. Each table sits behind its own
//! `tokio::sync::RwLock`; the seat claim checks and writes under a single
//! write guard, which is what makes it atomic here.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    BookingRepository, ClassFilter, ClassRepository, SeatClaim, StoreError, UserRepository,
};
use crate::domain::{
    Booking, BookingId, ClassEdit, ClassId, ClassListing, ClassStatus, Email, PaymentRecord,
    StatusChange, User, UserRole, UserUpsert,
};

/// Insertion sequence stands in for `created_at` ordering.
#[derive(Debug, Clone)]
struct Sequenced<T> {
    seq: u64,
    value: T,
}

#[derive(Debug)]
struct Table<K, V> {
    next_seq: u64,
    rows: HashMap<K, Sequenced<V>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            rows: HashMap::new(),
        }
    }
}

impl<K: std::hash::Hash + Eq, V: Clone> Table<K, V> {
    fn insert(&mut self, key: K, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rows.insert(key, Sequenced { seq, value });
    }

    /// Values newest first.
    fn newest_first<F>(&self, keep: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let mut rows: Vec<&Sequenced<V>> =
            self.rows.values().filter(|row| keep(&row.value)).collect();
        rows.sort_by_key(|row| Reverse(row.seq));
        rows.into_iter().map(|row| row.value.clone()).collect()
    }
}

/// In-memory users, classes, and bookings. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<Email, User>>>,
    classes: Arc<RwLock<Table<ClassId, ClassListing>>>,
    bookings: Arc<RwLock<Table<BookingId, Booking>>>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn upsert(&self, profile: UserUpsert) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let existing = users.get(&profile.email).cloned();
        let user = profile.apply(existing.as_ref());
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut listed: Vec<User> = users
            .values()
            .filter(|user| role.is_none_or(|role| user.role == role))
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(listed)
    }

    async fn set_role(&self, email: &Email, role: UserRole) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(email).map(|user| {
            user.role = role;
            user.clone()
        }))
    }
}

#[async_trait]
impl ClassRepository for InMemoryStore {
    async fn insert(&self, listing: &ClassListing) -> Result<(), StoreError> {
        let mut classes = self.classes.write().await;
        if classes.rows.contains_key(&listing.id) {
            return Err(StoreError::query("duplicate record"));
        }
        classes.insert(listing.id, listing.clone());
        Ok(())
    }

    async fn find(&self, id: &ClassId) -> Result<Option<ClassListing>, StoreError> {
        let classes = self.classes.read().await;
        Ok(classes.rows.get(id).map(|row| row.value.clone()))
    }

    async fn list(&self, filter: ClassFilter) -> Result<Vec<ClassListing>, StoreError> {
        let classes = self.classes.read().await;
        Ok(classes.newest_first(|listing| match &filter {
            ClassFilter::All => true,
            ClassFilter::Approved => listing.status == ClassStatus::Approved,
            ClassFilter::Instructor(email) => &listing.instructor_email == email,
        }))
    }

    async fn popular(&self, limit: u32) -> Result<Vec<ClassListing>, StoreError> {
        let classes = self.classes.read().await;
        let mut approved = classes.newest_first(|listing| listing.status == ClassStatus::Approved);
        // Stable sort keeps newest-first among equal enrollment counts.
        approved.sort_by_key(|listing| Reverse(listing.enrolled));
        approved.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(approved)
    }

    async fn update_details(
        &self,
        id: &ClassId,
        edit: &ClassEdit,
    ) -> Result<Option<ClassListing>, StoreError> {
        let mut classes = self.classes.write().await;
        Ok(classes.rows.get_mut(id).map(|row| {
            edit.apply_to(&mut row.value);
            row.value.clone()
        }))
    }

    async fn set_status(
        &self,
        id: &ClassId,
        change: &StatusChange,
    ) -> Result<Option<ClassListing>, StoreError> {
        let mut classes = self.classes.write().await;
        Ok(classes.rows.get_mut(id).map(|row| {
            row.value.status = change.status;
            row.value.feedback.clone_from(&change.feedback);
            row.value.clone()
        }))
    }

    async fn try_claim_seat(
        &self,
        id: &ClassId,
        full_threshold: u32,
    ) -> Result<SeatClaim, StoreError> {
        let mut classes = self.classes.write().await;
        let Some(row) = classes.rows.get_mut(id) else {
            return Ok(SeatClaim::NotFound);
        };
        let listing = &mut row.value;
        if listing.seat_capacity <= full_threshold {
            return Ok(SeatClaim::Full {
                seat_capacity: listing.seat_capacity,
                enrolled: listing.enrolled,
            });
        }
        let enrolled = listing
            .enrolled
            .checked_add(1)
            .ok_or_else(|| StoreError::query("enrolled count overflow"))?;
        listing.seat_capacity -= 1;
        listing.enrolled = enrolled;
        Ok(SeatClaim::Claimed {
            seat_capacity: listing.seat_capacity,
            enrolled: listing.enrolled,
        })
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert(&self, booking: &Booking) -> Result<(), StoreError> {
        if !self.classes.read().await.rows.contains_key(&booking.class_id) {
            return Err(StoreError::query("referenced record missing"));
        }
        let mut bookings = self.bookings.write().await;
        if bookings.rows.contains_key(&booking.id) {
            return Err(StoreError::query("duplicate record"));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find(&self, id: &BookingId) -> Result<Option<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.rows.get(id).map(|row| row.value.clone()))
    }

    async fn list_for_student(&self, email: &Email) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.newest_first(|booking| &booking.student_email == email))
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, StoreError> {
        Ok(self.bookings.write().await.rows.remove(id).is_some())
    }

    async fn record_payment(
        &self,
        id: &BookingId,
        payment: &PaymentRecord,
    ) -> Result<Option<Booking>, StoreError> {
        let mut bookings = self.bookings.write().await;
        Ok(bookings.rows.get_mut(id).map(|row| {
            row.value.mark_paid(payment.clone());
            row.value.clone()
        }))
    }
}

#[cfg(test)]
mod tests;
