//! Driving port for seat enrollment.

use async_trait::async_trait;

use crate::domain::{ClassId, EnrollmentOutcome, Error};

/// Claims a seat in a class listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Try to enroll one student into `class_id`.
    ///
    /// A full class is an [`EnrollmentOutcome::Full`], not an error; an unknown
    /// class is [`crate::domain::ErrorCode::NotFound`].
    async fn attempt_enroll(&self, class_id: &ClassId) -> Result<EnrollmentOutcome, Error>;
}
