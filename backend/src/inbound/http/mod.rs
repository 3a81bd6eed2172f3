//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod bookings;
pub mod classes;
pub mod enrollment;
pub mod error;
pub mod health;
pub mod payments;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod tokens;
pub mod users;
pub mod validation;

use actix_web::web;

use crate::domain::Error;

pub use error::ApiResult;

/// Register every REST route and JSON-shaped extractor errors.
///
/// Callers provide `web::Data<HttpState>`; health probes additionally need
/// `web::Data<HealthState>`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use academy::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid path: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query: {err}")).into()
    }))
    .service(health::index)
    .service(health::ready)
    .service(health::live)
    .service(tokens::issue_token)
    .service(users::upsert_user)
    .service(users::get_user)
    .service(users::get_user_role)
    .service(users::list_users)
    .service(users::set_user_role)
    .service(users::list_instructors)
    // Literal segments before `/classes/{id}`.
    .service(classes::list_classes)
    .service(classes::popular_classes)
    .service(classes::list_all_classes)
    .service(classes::instructor_classes)
    .service(classes::create_class)
    .service(enrollment::enroll)
    .service(classes::get_class)
    .service(classes::update_class)
    .service(classes::set_class_status)
    .service(bookings::list_bookings)
    .service(bookings::create_booking)
    .service(bookings::delete_booking)
    .service(bookings::record_payment)
    .service(payments::create_payment_intent);
}
