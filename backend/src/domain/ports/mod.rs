//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_repository;
mod class_repository;
mod enrollment_command;
mod payment_gateway;
mod store_error;
mod user_repository;

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::BookingRepository;
#[cfg(test)]
pub use class_repository::MockClassRepository;
pub use class_repository::{ClassFilter, ClassRepository, SeatClaim};
#[cfg(test)]
pub use enrollment_command::MockEnrollmentCommand;
pub use enrollment_command::EnrollmentCommand;
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{FixturePaymentGateway, PaymentGateway, PaymentGatewayError};
pub use store_error::StoreError;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
