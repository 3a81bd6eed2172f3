//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::Clock;

use academy::domain::ports::PaymentGateway;
use academy::domain::{EnrollmentPolicy, TokenIssuer};
use academy::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenIssuer,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) enrollment_policy: EnrollmentPolicy,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) payment_gateway: Option<Arc<dyn PaymentGateway>>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store and the
    /// fixture payment gateway.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenIssuer, clock: Arc<dyn Clock>) -> Self {
        Self {
            bind_addr,
            tokens,
            clock,
            enrollment_policy: EnrollmentPolicy::default(),
            db_pool: None,
            payment_gateway: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use a live payment provider instead of the fixture gateway.
    #[must_use]
    pub fn with_payment_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.payment_gateway = Some(gateway);
        self
    }

    #[must_use]
    pub fn with_enrollment_policy(mut self, policy: EnrollmentPolicy) -> Self {
        self.enrollment_policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "only read by the server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
