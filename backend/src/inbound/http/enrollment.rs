//! Seat claim endpoint.
//!
//! ```text
//! PATCH /classes/{id}/enroll
//! ```
//!
//! A full class is an outcome rather than a failure: the response is `200`
//! with `"status": "full"` and the error flag set, so clients can branch on
//! either field.

use actix_web::{patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ClassId, EnrollmentOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_class_id};

const FULL_MESSAGE: &str = "class is full";

/// Whether the seat claim succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Enrolled,
    Full,
}

/// Body returned by `PATCH /classes/{id}/enroll`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub status: EnrollmentStatus,
    pub class_id: ClassId,
    /// Open seats after the attempt.
    pub seat_capacity: u32,
    /// Confirmed enrollments after the attempt.
    pub enrolled: u32,
    /// Present and `true` when the class is full.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<EnrollmentOutcome> for EnrollmentResponse {
    fn from(value: EnrollmentOutcome) -> Self {
        match value {
            EnrollmentOutcome::Enrolled {
                class_id,
                seat_capacity,
                enrolled,
            } => Self {
                status: EnrollmentStatus::Enrolled,
                class_id,
                seat_capacity,
                enrolled,
                error: None,
                message: None,
            },
            EnrollmentOutcome::Full {
                class_id,
                seat_capacity,
                enrolled,
            } => Self {
                status: EnrollmentStatus::Full,
                class_id,
                seat_capacity,
                enrolled,
                error: Some(true),
                message: Some(FULL_MESSAGE.to_owned()),
            },
        }
    }
}

/// Claim one seat in a class.
#[utoipa::path(
    patch,
    path = "/classes/{id}/enroll",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "Enrolled, or full with the error flag set", body = EnrollmentResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Class not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "enrollInClass"
)]
#[patch("/classes/{id}/enroll")]
pub async fn enroll(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EnrollmentResponse>> {
    let id = parse_class_id(&path, FieldName::new("id"))?;
    let outcome = state.enrollment.attempt_enroll(&id).await?;
    tracing::debug!(class_id = %id, student = %caller.email(), enrolled = outcome.is_enrolled(), "enrollment attempted");
    Ok(web::Json(outcome.into()))
}
