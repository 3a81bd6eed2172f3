//! Marketplace users: students, instructors and admins keyed by email.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors for user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain a single '@' with text on both sides")]
    InvalidEmail,
    #[error("name must not be empty")]
    EmptyName,
    #[error("unknown role `{0}`")]
    UnknownRole(String),
}

/// Case-normalised email address; the natural key for users.
///
/// # Examples
/// ```
/// use academy::domain::Email;
///
/// let email = Email::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate, trim and lower-case an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let mut parts = trimmed.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty()
            || domain.is_empty()
            || parts.next().is_some()
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role a user plays in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Instructor,
    Admin,
}

impl UserRole {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Stored user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: Email,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Profile values written by a sign-in upsert.
///
/// `role` only takes effect on the first insert, which stores
/// [`UserRole::Student`] when none is supplied. Existing records keep their
/// role; changes go through the admin role endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpsert {
    pub email: Email,
    pub name: String,
    pub photo_url: Option<String>,
    pub role: Option<UserRole>,
}

impl UserUpsert {
    /// Validate the profile fields.
    pub fn new(
        email: Email,
        name: impl Into<String>,
        photo_url: Option<String>,
        role: Option<UserRole>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self {
            email,
            name: name.trim().to_owned(),
            photo_url: photo_url.filter(|url| !url.trim().is_empty()),
            role,
        })
    }

    /// Merge onto an existing record, or create a fresh one.
    pub fn apply(self, existing: Option<&User>) -> User {
        let role = existing
            .map(|user| user.role)
            .unwrap_or_else(|| self.role.unwrap_or_default());
        User {
            email: self.email,
            name: self.name,
            role,
            photo_url: self.photo_url,
        }
    }
}
