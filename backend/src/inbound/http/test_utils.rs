//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use crate::Trace;
use crate::domain::ports::{
    BookingRepository, ClassRepository, EnrollmentCommand, MockBookingRepository,
    MockClassRepository, MockEnrollmentCommand, MockPaymentGateway, MockUserRepository,
    PaymentGateway, UserRepository,
};
use crate::domain::{
    ClassId, ClassListing, ClassStatus, Email, NewClassListing, TokenIssuer, User, UserRole,
};

use super::state::{HttpState, HttpStatePorts};

/// Clock frozen at a fixed instant until advanced.
pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(Mutex::new(instant))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().expect("clock lock");
        *now += by;
    }
}

impl Default for TestClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        Self::at(start)
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// Builds [`HttpState`] from mocks. Ports left unset reject every call.
pub struct StateBuilder {
    users: Arc<dyn UserRepository>,
    classes: Arc<dyn ClassRepository>,
    bookings: Arc<dyn BookingRepository>,
    enrollment: Arc<dyn EnrollmentCommand>,
    payments: Arc<dyn PaymentGateway>,
    clock: Arc<TestClock>,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            classes: Arc::new(MockClassRepository::new()),
            bookings: Arc::new(MockBookingRepository::new()),
            enrollment: Arc::new(MockEnrollmentCommand::new()),
            payments: Arc::new(MockPaymentGateway::new()),
            clock: Arc::new(TestClock::default()),
        }
    }
}

impl StateBuilder {
    pub fn users(mut self, users: impl UserRepository + 'static) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub fn classes(mut self, classes: impl ClassRepository + 'static) -> Self {
        self.classes = Arc::new(classes);
        self
    }

    pub fn bookings(mut self, bookings: impl BookingRepository + 'static) -> Self {
        self.bookings = Arc::new(bookings);
        self
    }

    pub fn enrollment(mut self, enrollment: impl EnrollmentCommand + 'static) -> Self {
        self.enrollment = Arc::new(enrollment);
        self
    }

    pub fn payments(mut self, payments: impl PaymentGateway + 'static) -> Self {
        self.payments = Arc::new(payments);
        self
    }

    /// Shared handle on the clock the state will use.
    pub fn clock(&self) -> Arc<TestClock> {
        Arc::clone(&self.clock)
    }

    pub fn build(self) -> HttpState {
        let clock: Arc<dyn Clock> = self.clock;
        let tokens = TokenIssuer::new(&[42; 32], Duration::from_secs(3_600), Arc::clone(&clock));
        HttpState::new(
            HttpStatePorts {
                users: self.users,
                classes: self.classes,
                bookings: self.bookings,
                enrollment: self.enrollment,
                payments: self.payments,
            },
            tokens,
            clock,
        )
    }
}

pub fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

pub fn user(raw: &str, role: UserRole) -> User {
    User {
        email: email(raw),
        name: "Test User".to_owned(),
        role,
        photo_url: None,
    }
}

/// Approved listing owned by `instructor`.
pub fn listing(instructor: &str, seats: u32) -> ClassListing {
    let mut listing = NewClassListing::new(
        email(instructor),
        "Sensei",
        "Conversational Japanese",
        None,
        4_500,
        i64::from(seats),
    )
    .expect("valid listing")
    .into_listing(ClassId::random());
    listing.status = ClassStatus::Approved;
    listing
}

/// User repository that answers `find_by_email` from a fixed roster.
pub fn users_with_roles(roster: &[(&str, UserRole)]) -> MockUserRepository {
    let known: Vec<User> = roster.iter().map(|(raw, role)| user(raw, *role)).collect();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(0..)
        .returning(move |email| Ok(known.iter().find(|u| &u.email == email).cloned()));
    users
}

/// `Authorization` header value for `raw`.
pub fn bearer(state: &HttpState, raw: &str) -> String {
    let token = state.tokens.issue(&email(raw)).expect("token issues");
    format!("Bearer {}", token.as_str())
}

/// Initialise the full route table over `state`.
pub async fn init_app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(super::configure),
    )
    .await
}

/// Drive a request and decode the JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: actix_test::TestRequest,
) -> (actix_web::http::StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}
