//! Port for class listing persistence, including the seat claim used by
//! enrollment.

use async_trait::async_trait;

use crate::domain::{ClassEdit, ClassId, ClassListing, Email, StatusChange};

use super::StoreError;

/// Which listings a query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassFilter {
    /// Every listing regardless of status.
    All,
    /// Publicly visible listings.
    Approved,
    /// Listings owned by one instructor.
    Instructor(Email),
}

/// Result of a conditional seat claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClaim {
    /// A seat moved from `seat_capacity` to `enrolled`; values are post-update.
    Claimed { seat_capacity: u32, enrolled: u32 },
    /// The precondition failed; nothing was written.
    Full { seat_capacity: u32, enrolled: u32 },
    /// No listing has this identifier.
    NotFound,
}

/// Storage of class listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Persist a new listing.
    async fn insert(&self, listing: &ClassListing) -> Result<(), StoreError>;

    /// Fetch a listing by identifier.
    async fn find(&self, id: &ClassId) -> Result<Option<ClassListing>, StoreError>;

    /// List listings matching `filter`, newest first.
    async fn list(&self, filter: ClassFilter) -> Result<Vec<ClassListing>, StoreError>;

    /// Approved listings ordered by `enrolled` descending.
    async fn popular(&self, limit: u32) -> Result<Vec<ClassListing>, StoreError>;

    /// Apply an instructor edit. Returns `None` when the listing is absent.
    async fn update_details(
        &self,
        id: &ClassId,
        edit: &ClassEdit,
    ) -> Result<Option<ClassListing>, StoreError>;

    /// Apply a moderation decision. Returns `None` when the listing is absent.
    async fn set_status(
        &self,
        id: &ClassId,
        change: &StatusChange,
    ) -> Result<Option<ClassListing>, StoreError>;

    /// Atomically move one seat into `enrolled` when
    /// `seat_capacity > full_threshold`.
    ///
    /// Implementations must perform the check and the write as a single
    /// compare-and-swap so concurrent claims never oversell a listing.
    async fn try_claim_seat(
        &self,
        id: &ClassId,
        full_threshold: u32,
    ) -> Result<SeatClaim, StoreError>;
}
