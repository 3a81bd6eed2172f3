//! Seat-capacity-safe enrollment.
//!
//! The check ("is a seat open?") and the write ("take it") are delegated to
//! the store as one conditional update, so the number of successful
//! enrollments can never exceed the seats that were open.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{ClassRepository, EnrollmentCommand, SeatClaim};
use crate::domain::{ClassId, Error};

/// Decides when a listing counts as full.
///
/// Enrollment is allowed only while `seat_capacity > full_threshold`. The
/// default threshold of zero rejects enrollment once every seat is taken;
/// raising it holds seats back.
///
/// # Examples
/// ```
/// use academy::domain::EnrollmentPolicy;
///
/// let policy = EnrollmentPolicy::default();
/// assert!(policy.allows(1));
/// assert!(!policy.allows(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrollmentPolicy {
    full_threshold: u32,
}

impl EnrollmentPolicy {
    /// Policy with an explicit threshold.
    pub const fn with_full_threshold(full_threshold: u32) -> Self {
        Self { full_threshold }
    }

    /// Seats at or below this count are never handed out.
    pub const fn full_threshold(self) -> u32 {
        self.full_threshold
    }

    /// Whether a listing with `seat_capacity` open seats can take one more.
    pub const fn allows(self, seat_capacity: u32) -> bool {
        seat_capacity > self.full_threshold
    }
}

/// Result of an enrollment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    /// A seat was claimed; counts are post-update.
    Enrolled {
        class_id: ClassId,
        seat_capacity: u32,
        enrolled: u32,
    },
    /// No seat was available; the listing is unchanged.
    Full {
        class_id: ClassId,
        seat_capacity: u32,
        enrolled: u32,
    },
}

impl EnrollmentOutcome {
    /// Whether a seat was claimed.
    pub fn is_enrolled(&self) -> bool {
        matches!(self, Self::Enrolled { .. })
    }
}

/// Enrollment service implementing [`EnrollmentCommand`].
pub struct EnrollmentService<R: ?Sized> {
    classes: Arc<R>,
    policy: EnrollmentPolicy,
}

impl<R: ?Sized> Clone for EnrollmentService<R> {
    fn clone(&self) -> Self {
        Self {
            classes: Arc::clone(&self.classes),
            policy: self.policy,
        }
    }
}

impl<R: ?Sized> EnrollmentService<R> {
    /// Create a service over the given class store.
    pub fn new(classes: Arc<R>, policy: EnrollmentPolicy) -> Self {
        Self { classes, policy }
    }

    /// Active policy.
    pub fn policy(&self) -> EnrollmentPolicy {
        self.policy
    }
}

#[async_trait]
impl<R> EnrollmentCommand for EnrollmentService<R>
where
    R: ClassRepository + ?Sized,
{
    async fn attempt_enroll(&self, class_id: &ClassId) -> Result<EnrollmentOutcome, Error> {
        let claim = self
            .classes
            .try_claim_seat(class_id, self.policy.full_threshold())
            .await?;

        match claim {
            SeatClaim::Claimed {
                seat_capacity,
                enrolled,
            } => {
                info!(%class_id, seat_capacity, enrolled, "seat claimed");
                Ok(EnrollmentOutcome::Enrolled {
                    class_id: *class_id,
                    seat_capacity,
                    enrolled,
                })
            }
            SeatClaim::Full {
                seat_capacity,
                enrolled,
            } => {
                debug!(%class_id, seat_capacity, threshold = self.policy.full_threshold(), "class full");
                Ok(EnrollmentOutcome::Full {
                    class_id: *class_id,
                    seat_capacity,
                    enrolled,
                })
            }
            SeatClaim::NotFound => Err(Error::not_found("class not found")),
        }
    }
}
