//! Builders selecting adapters for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use academy::domain::EnrollmentService;
use academy::domain::ports::{
    BookingRepository, ClassRepository, FixturePaymentGateway, PaymentGateway, UserRepository,
};
use academy::inbound::http::state::{HttpState, HttpStatePorts};
use academy::outbound::memory::InMemoryStore;
use academy::outbound::persistence::{
    DieselBookingRepository, DieselClassRepository, DieselUserRepository,
};

use super::ServerConfig;

struct Stores {
    users: Arc<dyn UserRepository>,
    classes: Arc<dyn ClassRepository>,
    bookings: Arc<dyn BookingRepository>,
}

fn build_stores(config: &ServerConfig) -> Stores {
    match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "using Diesel repositories");
            Stores {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                classes: Arc::new(DieselClassRepository::new(pool.clone())),
                bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
            }
        }
        None => {
            info!(store = "memory", "no database configured; using the in-memory store");
            let store = Arc::new(InMemoryStore::new());
            Stores {
                users: store.clone(),
                classes: store.clone(),
                bookings: store,
            }
        }
    }
}

fn build_payment_gateway(config: &ServerConfig) -> Arc<dyn PaymentGateway> {
    config.payment_gateway.clone().unwrap_or_else(|| {
        info!("no payment provider configured; using the fixture gateway");
        Arc::new(FixturePaymentGateway)
    })
}

/// Assemble the HTTP state from the configured adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let Stores {
        users,
        classes,
        bookings,
    } = build_stores(config);
    let enrollment = Arc::new(EnrollmentService::new(
        Arc::clone(&classes),
        config.enrollment_policy,
    ));
    info!(
        full_threshold = config.enrollment_policy.full_threshold(),
        "enrollment policy configured"
    );

    let ports = HttpStatePorts {
        users,
        classes,
        bookings,
        enrollment,
        payments: build_payment_gateway(config),
    };
    web::Data::new(HttpState::new(
        ports,
        config.tokens.clone(),
        Arc::clone(&config.clock),
    ))
}
