//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::TokenIssuer;
use crate::domain::ports::{
    BookingRepository, ClassRepository, EnrollmentCommand, PaymentGateway, UserRepository,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub classes: Arc<dyn ClassRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub enrollment: Arc<dyn EnrollmentCommand>,
    pub payments: Arc<dyn PaymentGateway>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub classes: Arc<dyn ClassRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub enrollment: Arc<dyn EnrollmentCommand>,
    pub payments: Arc<dyn PaymentGateway>,
    pub tokens: Arc<TokenIssuer>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from ports, the token issuer, and a clock.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use academy::domain::ports::FixturePaymentGateway;
    /// use academy::domain::{EnrollmentPolicy, EnrollmentService, TokenIssuer};
    /// use academy::inbound::http::state::{HttpState, HttpStatePorts};
    /// use academy::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let clock = Arc::new(DefaultClock);
    /// let ports = HttpStatePorts {
    ///     users: store.clone(),
    ///     classes: store.clone(),
    ///     bookings: store.clone(),
    ///     enrollment: Arc::new(EnrollmentService::new(store, EnrollmentPolicy::default())),
    ///     payments: Arc::new(FixturePaymentGateway),
    /// };
    /// let tokens = TokenIssuer::new(&[7; 32], Duration::from_secs(3_600), clock.clone());
    /// let state = HttpState::new(ports, tokens, clock);
    /// let _users = state.users.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, tokens: TokenIssuer, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            users,
            classes,
            bookings,
            enrollment,
            payments,
        } = ports;
        Self {
            users,
            classes,
            bookings,
            enrollment,
            payments,
            tokens: Arc::new(tokens),
            clock,
        }
    }
}
