//! Wire shapes for the Stripe payment intents API.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct PaymentIntentDto {
    #[serde(default)]
    pub(super) id: Option<String>,
    #[serde(default)]
    pub(super) client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeErrorEnvelopeDto {
    pub(super) error: StripeErrorDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeErrorDto {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default, rename = "type")]
    pub(super) kind: Option<String>,
}
