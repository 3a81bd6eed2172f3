//! Payment provider adapters.

mod dto;
mod stripe;

pub use stripe::{DEFAULT_STRIPE_BASE_URL, StripePaymentGateway};
