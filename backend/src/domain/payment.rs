//! Value types for payment-intent creation.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Validation errors for payment amounts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentAmountError {
    #[error("price must be a finite number")]
    NotFinite,
    #[error("price must be greater than zero")]
    NotPositive,
    #[error("price is too large")]
    TooLarge,
}

/// Positive amount in the currency's minor unit (cents for USD).
///
/// # Examples
/// ```
/// use academy::domain::PaymentAmount;
///
/// let amount = PaymentAmount::from_price(19.99).expect("positive price");
/// assert_eq!(amount.minor_units(), 1999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaymentAmount(u64);

/// 2^64, the first value a `u64` cannot hold.
const CENTS_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn whole_cents(cents: f64) -> Result<u64, PaymentAmountError> {
    if cents <= 0.0 {
        return Err(PaymentAmountError::NotPositive);
    }
    if cents >= CENTS_LIMIT {
        return Err(PaymentAmountError::TooLarge);
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is checked to be a positive integer within range"
    )]
    let minor = cents as u64;
    Ok(minor)
}

impl PaymentAmount {
    /// Convert a decimal major-unit price into minor units, rounding to the
    /// nearest cent.
    pub fn from_price(price: f64) -> Result<Self, PaymentAmountError> {
        if !price.is_finite() {
            return Err(PaymentAmountError::NotFinite);
        }
        whole_cents((price * 100.0).round()).map(Self)
    }

    /// Build from an amount already expressed in minor units.
    pub fn from_minor_units(cents: u64) -> Result<Self, PaymentAmountError> {
        if cents == 0 {
            return Err(PaymentAmountError::NotPositive);
        }
        Ok(Self(cents))
    }

    /// Amount in minor units.
    pub fn minor_units(self) -> u64 {
        self.0
    }
}

/// Settlement currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
}

impl Currency {
    /// ISO 4217 code in the lower case the payment provider expects.
    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "usd",
        }
    }
}

/// Opaque secret the client uses to confirm a payment intent.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Wrap the provider's secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret for the response body.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(**redacted**)")
    }
}

impl Drop for ClientSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
