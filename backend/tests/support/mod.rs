//! Shared helpers for the integration suites.
//!
//! Builds the full route table over an [`InMemoryStore`] so suites can seed
//! data directly through the repository ports and then drive HTTP requests.

pub mod embedded_postgres;

use std::sync::Arc;
use std::time::Duration;

use academy::Trace;
use academy::domain::ports::{ClassRepository, FixturePaymentGateway, UserRepository};
use academy::domain::{
    ClassId, ClassListing, ClassStatus, Email, EnrollmentPolicy, EnrollmentService,
    NewClassListing, TokenIssuer, User, UserRole, UserUpsert,
};
use academy::inbound::http::configure;
use academy::inbound::http::state::{HttpState, HttpStatePorts};
use academy::outbound::memory::InMemoryStore;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockable::{Clock, DefaultClock};
use serde_json::Value;

/// In-memory backend plus the state handlers see.
pub struct Backend {
    pub store: Arc<InMemoryStore>,
    pub state: HttpState,
}

impl Backend {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let tokens = TokenIssuer::new(&[11; 32], Duration::from_secs(3_600), Arc::clone(&clock));
        let ports = HttpStatePorts {
            users: store.clone(),
            classes: store.clone(),
            bookings: store.clone(),
            enrollment: Arc::new(EnrollmentService::new(store.clone(), EnrollmentPolicy::default())),
            payments: Arc::new(FixturePaymentGateway),
        };
        Self {
            store,
            state: HttpState::new(ports, tokens, clock),
        }
    }

    /// `Authorization` header value for `raw`.
    pub fn bearer(&self, raw: &str) -> String {
        let token = self.state.tokens.issue(&email(raw)).expect("token issues");
        format!("Bearer {}", token.as_str())
    }

    pub async fn seed_user(&self, raw: &str, role: UserRole) -> User {
        let profile = UserUpsert::new(email(raw), "Seeded User", None, Some(role))
            .expect("valid profile");
        self.store.upsert(profile).await.expect("user stored")
    }

    /// Approved listing owned by `instructor` with `seats` open seats.
    pub async fn seed_class(&self, instructor: &str, seats: u32) -> ClassListing {
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
        ClassRepository::insert(self.store.as_ref(), &listing)
            .await
            .expect("listing stored");
        listing
    }

    pub async fn class(&self, id: &ClassId) -> ClassListing {
        ClassRepository::find(self.store.as_ref(), id)
            .await
            .expect("lookup succeeds")
            .expect("listing exists")
    }

    /// Initialise the full route table.
    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .wrap(Trace)
                .configure(configure),
        )
        .await
    }
}

pub fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

/// Drive a request and decode the JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
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
