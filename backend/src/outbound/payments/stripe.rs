//! Reqwest-backed Stripe adapter for the payment gateway port.
//!
//! Only payment intent creation is modelled: a form-encoded POST to
//! `/v1/payment_intents` authenticated with the secret key as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::{PaymentIntentDto, StripeErrorEnvelopeDto};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{ClientSecret, Currency, PaymentAmount};

/// Production Stripe API root.
pub const DEFAULT_STRIPE_BASE_URL: &str = "https://api.stripe.com/";

/// Payment gateway calling the Stripe REST API.
pub struct StripePaymentGateway {
    client: Client,
    endpoint: Url,
    secret_key: Zeroizing<String>,
}

impl StripePaymentGateway {
    /// Build an adapter against `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot be joined or the client cannot be built.
    pub fn new(
        base_url: &Url,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PaymentGatewayError> {
        let endpoint = base_url
            .join("v1/payment_intents")
            .map_err(|err| PaymentGatewayError::transport(format!("invalid base url: {err}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PaymentGatewayError::transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            secret_key: Zeroizing::new(secret_key.into()),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn create_intent(
        &self,
        amount: PaymentAmount,
        currency: Currency,
    ) -> Result<ClientSecret, PaymentGatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.secret_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&intent_form(amount, currency))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            warn!(status = status.as_u16(), %error, "payment intent rejected");
            return Err(error);
        }
        parse_client_secret(body.as_ref())
    }
}

fn intent_form(amount: PaymentAmount, currency: Currency) -> Vec<(&'static str, String)> {
    vec![
        ("amount", amount.minor_units().to_string()),
        ("currency", currency.code().to_owned()),
        ("payment_method_types[]", "card".to_owned()),
    ]
}

fn parse_client_secret(body: &[u8]) -> Result<ClientSecret, PaymentGatewayError> {
    let intent: PaymentIntentDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid payment intent JSON: {error}"))
    })?;
    let secret = intent
        .client_secret
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| PaymentGatewayError::decode("payment intent has no client_secret"))?;
    debug!(intent_id = intent.id.as_deref().unwrap_or("unknown"), "payment intent created");
    Ok(ClientSecret::new(secret))
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    PaymentGatewayError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let message = serde_json::from_slice::<StripeErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| {
            let kind = envelope.error.kind.unwrap_or_default();
            envelope
                .error
                .message
                .map(|message| format!("{kind}: {message}"))
        })
        .unwrap_or_else(|| format!("status {}", status.as_u16()));
    PaymentGatewayError::rejected(status.as_u16(), message)
}
