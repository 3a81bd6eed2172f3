//! Port for user profile persistence.

use async_trait::async_trait;

use crate::domain::{Email, User, UserRole, UserUpsert};

use super::StoreError;

/// Storage of user profiles keyed by email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or update a profile and return the stored record.
    ///
    /// Repeated calls for the same email leave exactly one record holding the
    /// latest values.
    async fn upsert(&self, profile: UserUpsert) -> Result<User, StoreError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    /// List users, optionally restricted to one role, ordered by email.
    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, StoreError>;

    /// Change a user's role. Returns `None` when the user does not exist.
    async fn set_role(&self, email: &Email, role: UserRole) -> Result<Option<User>, StoreError>;
}
