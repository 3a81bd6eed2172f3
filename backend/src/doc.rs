//! OpenAPI documentation configuration.
//!
//! Registers every REST endpoint, the request/response schemas, and the
//! bearer token security scheme. The document backs Swagger UI in debug
//! builds and is exported via `cargo run --bin openapi-dump`.

use crate::domain::{
    Booking, BookingStatus, ClassListing, ClassStatus, PaymentRecord, User, UserRole,
};
use crate::inbound::http::bookings::{
    DeleteBookingResponse, NewBookingRequest, PaymentConfirmation,
};
use crate::inbound::http::classes::{ClassEditRequest, NewClassRequest, StatusChangeRequest};
use crate::inbound::http::enrollment::{EnrollmentResponse, EnrollmentStatus};
use crate::inbound::http::payments::{PaymentIntentRequest, PaymentIntentResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tokens::{TokenRequest, TokenResponse};
use crate::inbound::http::users::{RoleBody, UserProfileRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token issued by POST /jwt."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Language academy backend API",
        description = "Class listings, bookings, seat-safe enrollment, and payment intents."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::health::index,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::tokens::issue_token,
        crate::inbound::http::users::upsert_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::get_user_role,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::set_user_role,
        crate::inbound::http::users::list_instructors,
        crate::inbound::http::classes::list_classes,
        crate::inbound::http::classes::popular_classes,
        crate::inbound::http::classes::list_all_classes,
        crate::inbound::http::classes::instructor_classes,
        crate::inbound::http::classes::get_class,
        crate::inbound::http::classes::create_class,
        crate::inbound::http::classes::update_class,
        crate::inbound::http::classes::set_class_status,
        crate::inbound::http::enrollment::enroll,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::delete_booking,
        crate::inbound::http::bookings::record_payment,
        crate::inbound::http::payments::create_payment_intent,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        User,
        UserRole,
        ClassListing,
        ClassStatus,
        Booking,
        BookingStatus,
        PaymentRecord,
        TokenRequest,
        TokenResponse,
        UserProfileRequest,
        RoleBody,
        NewClassRequest,
        ClassEditRequest,
        StatusChangeRequest,
        EnrollmentResponse,
        EnrollmentStatus,
        NewBookingRequest,
        PaymentConfirmation,
        DeleteBookingResponse,
        PaymentIntentRequest,
        PaymentIntentResponse,
    )),
    tags(
        (name = "auth", description = "Bearer token issuance"),
        (name = "users", description = "User profiles and roles"),
        (name = "classes", description = "Class listings and enrollment"),
        (name = "bookings", description = "Student bookings"),
        (name = "payments", description = "Payment intents"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "traceId")]
    #[case("ClassListing", "seatCapacity")]
    #[case("EnrollmentResponse", "status")]
    #[case("Booking", "studentEmail")]
    fn schemas_use_wire_field_names(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("/classes/{id}/enroll")]
    #[case("/jwt")]
    #[case("/create-payment-intent")]
    #[case("/bookings/{id}")]
    fn core_paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
