//! Bearer token guard used by protected handlers.
//!
//! Handlers opt in by taking an [`AuthenticatedUser`] argument; public
//! handlers simply omit it.

use std::future::{Ready, ready};

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::debug;

use crate::domain::ports::UserRepository;
use crate::domain::{Email, Error, TokenError, User, UserRole};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identity proven by a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(Email);

impl AuthenticatedUser {
    /// Email carried in the token subject.
    pub fn email(&self) -> &Email {
        &self.0
    }

    /// Reject callers acting on someone else's records.
    pub fn require_self(&self, email: &Email) -> Result<(), Error> {
        if &self.0 == email {
            Ok(())
        } else {
            Err(Error::forbidden("forbidden access"))
        }
    }

    /// Load the caller's profile and require `role`.
    ///
    /// Callers without a stored profile are treated as lacking the role.
    pub async fn require_role(
        &self,
        users: &dyn UserRepository,
        role: UserRole,
    ) -> Result<User, Error> {
        match users.find_by_email(&self.0).await? {
            Some(user) if user.role == role => Ok(user),
            _ => {
                debug!(email = %self.0, required = %role, "role check failed");
                Err(Error::forbidden("forbidden access"))
            }
        }
    }

    /// Allow the record's owner or any admin.
    pub async fn require_self_or_admin(
        &self,
        users: &dyn UserRepository,
        email: &Email,
    ) -> Result<(), Error> {
        if &self.0 == email {
            return Ok(());
        }
        self.require_role(users, UserRole::Admin).await.map(|_| ())
    }

    fn from_headers(req: &HttpRequest) -> Result<Self, Error> {
        let state = req
            .app_data::<web::Data<HttpState>>()
            .ok_or_else(|| Error::internal("http state not configured"))?;
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthorized("unauthorized access"))?;

        state.tokens.verify(token).map(Self).map_err(|err| {
            match err {
                TokenError::Expired => debug!("rejected expired token"),
                other => debug!(error = %other, "rejected token"),
            }
            Error::unauthorized("invalid token")
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req).map_err(actix_web::Error::from))
    }
}
