//! Booking handlers.
//!
//! ```text
//! GET    /bookings/{email}
//! POST   /bookings {"classId":"..."}
//! DELETE /bookings/{id}
//! PATCH  /bookings/{id}/payment {"transactionId":"pi_..."}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Booking, BookingId, ClassStatus, Error, PaymentRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ErrorCode, FieldName, field_error, parse_booking_id, parse_class_id, parse_email,
};

const ID: FieldName = FieldName::new("id");

/// Body for `POST /bookings`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingRequest {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub class_id: String,
}

/// Body for `PATCH /bookings/{id}/payment`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    #[schema(example = "pi_3MtwBwLkdIwHu7ix28a3tqPa")]
    pub transaction_id: String,
}

/// Result of `DELETE /bookings/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBookingResponse {
    /// `false` when no booking had this id.
    pub deleted: bool,
}

fn booking_not_found() -> Error {
    Error::not_found("booking not found")
}

/// Owners may always act; anyone else must be an admin.
async fn require_owner(
    state: &HttpState,
    caller: &AuthenticatedUser,
    booking: &Booking,
) -> ApiResult<()> {
    caller
        .require_self_or_admin(state.users.as_ref(), &booking.student_email)
        .await
}

/// Bookings held by a student.
#[utoipa::path(
    get,
    path = "/bookings/{email}",
    params(("email" = String, Path, description = "Student email")),
    responses(
        (status = 200, description = "Bookings", body = [Booking]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings/{email}")]
pub async fn list_bookings(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Booking>>> {
    let email = parse_email(&path, FieldName::new("email"))?;
    caller
        .require_self_or_admin(state.users.as_ref(), &email)
        .await?;
    Ok(web::Json(state.bookings.list_for_student(&email).await?))
}

/// Book an approved class for the caller.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = NewBookingRequest,
    responses(
        (status = 201, description = "Booked", body = Booking),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Class not found", body = ErrorSchema),
        (status = 409, description = "Class not open for booking", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<NewBookingRequest>,
) -> ApiResult<HttpResponse> {
    let class_id = parse_class_id(&payload.class_id, FieldName::new("classId"))?;
    let listing = state
        .classes
        .find(&class_id)
        .await?
        .ok_or_else(|| Error::not_found("class not found"))?;
    if listing.status != ClassStatus::Approved {
        return Err(Error::conflict("class is not open for booking"));
    }

    let booking = Booking::for_listing(BookingId::random(), &listing, caller.email().clone());
    state.bookings.insert(&booking).await?;
    info!(booking_id = %booking.id, class_id = %class_id, student = %caller.email(), "class booked");
    Ok(HttpResponse::Created().json(booking))
}

/// Cancel a booking. Deleting an unknown id is not an error.
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Deletion result", body = DeleteBookingResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "deleteBooking"
)]
#[delete("/bookings/{id}")]
pub async fn delete_booking(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteBookingResponse>> {
    let id = parse_booking_id(&path, ID)?;
    let Some(booking) = state.bookings.find(&id).await? else {
        return Ok(web::Json(DeleteBookingResponse { deleted: false }));
    };
    require_owner(&state, &caller, &booking).await?;

    let deleted = state.bookings.delete(&id).await?;
    info!(booking_id = %id, deleted, "booking cancelled");
    Ok(web::Json(DeleteBookingResponse { deleted }))
}

/// Record a completed payment.
#[utoipa::path(
    patch,
    path = "/bookings/{id}/payment",
    params(("id" = String, Path, description = "Booking id")),
    request_body = PaymentConfirmation,
    responses(
        (status = 200, description = "Paid booking", body = Booking),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "recordBookingPayment"
)]
#[patch("/bookings/{id}/payment")]
pub async fn record_payment(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PaymentConfirmation>,
) -> ApiResult<web::Json<Booking>> {
    let id = parse_booking_id(&path, ID)?;
    let transaction_id = payload.into_inner().transaction_id.trim().to_owned();
    if transaction_id.is_empty() {
        return Err(field_error(
            FieldName::new("transactionId"),
            ErrorCode::InvalidValue,
            "transaction id must not be empty",
        ));
    }
    let booking = state
        .bookings
        .find(&id)
        .await?
        .ok_or_else(booking_not_found)?;
    require_owner(&state, &caller, &booking).await?;

    let payment = PaymentRecord {
        transaction_id,
        paid_at: state.clock.utc(),
    };
    let paid = state
        .bookings
        .record_payment(&id, &payment)
        .await?
        .ok_or_else(booking_not_found)?;
    info!(booking_id = %id, transaction_id = %payment.transaction_id, "booking paid");
    Ok(web::Json(paid))
}
