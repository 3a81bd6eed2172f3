//! Outbound adapters: PostgreSQL and in-memory stores, and the payment
//! provider client.

pub mod memory;
pub mod payments;
pub mod persistence;
