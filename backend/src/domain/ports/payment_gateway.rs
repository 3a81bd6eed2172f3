//! Driven port for the external payment provider.

use async_trait::async_trait;
use tracing::error;

use crate::domain::{ClientSecret, Currency, Error, PaymentAmount};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The provider could not be reached.
        Transport { message: String } => "payment provider transport failed: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } => "payment provider rejected request ({status}): {message}",
        /// The provider's response could not be understood.
        Decode { message: String } => "payment provider response invalid: {message}",
    }
}

impl From<PaymentGatewayError> for Error {
    fn from(value: PaymentGatewayError) -> Self {
        error!(error = %value, "payment intent creation failed");
        match value {
            PaymentGatewayError::Transport { .. } => {
                Error::service_unavailable("payment provider unavailable")
            }
            PaymentGatewayError::Rejected { status, .. } if status < 500 => {
                Error::invalid_request("payment provider rejected the payment")
            }
            PaymentGatewayError::Rejected { .. } => {
                Error::service_unavailable("payment provider unavailable")
            }
            PaymentGatewayError::Decode { .. } => Error::internal(value.to_string()),
        }
    }
}

/// Creates payment intents with the provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `amount` and return its client secret verbatim.
    async fn create_intent(
        &self,
        amount: PaymentAmount,
        currency: Currency,
    ) -> Result<ClientSecret, PaymentGatewayError>;
}

/// Deterministic gateway used when no provider key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_intent(
        &self,
        amount: PaymentAmount,
        currency: Currency,
    ) -> Result<ClientSecret, PaymentGatewayError> {
        Ok(ClientSecret::new(format!(
            "pi_fixture_{}_{}_secret_fixture",
            amount.minor_units(),
            currency.code()
        )))
    }
}
