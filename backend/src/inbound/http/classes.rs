//! Class listing handlers.
//!
//! ```text
//! GET   /classes
//! GET   /classes/popular?limit=6
//! GET   /classes/all
//! GET   /classes/instructor/{email}
//! GET   /classes/{id}
//! POST  /classes
//! PUT   /classes/{id}
//! PATCH /classes/{id}/status
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ClassFilter;
use crate::domain::{
    ClassEdit, ClassId, ClassListing, ClassStatus, ClassValidationError, Error, NewClassListing,
    StatusChange, UserRole, price_cents_from, seat_capacity_from,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_class_id, parse_email,
};

const ID: FieldName = FieldName::new("id");
const DEFAULT_POPULAR_LIMIT: u32 = 6;
const MAX_POPULAR_LIMIT: u32 = 50;

/// Query for `GET /classes/popular`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PopularQuery {
    /// Number of listings, 1 to 50. Defaults to 6.
    pub limit: Option<u32>,
}

/// Body for `POST /classes`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewClassRequest {
    #[schema(example = "Conversational Japanese")]
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[schema(example = 4500)]
    pub price_cents: u64,
    #[schema(example = 12)]
    pub seat_capacity: i64,
}

/// Body for `PUT /classes/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassEditRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price_cents: Option<u64>,
    #[serde(default)]
    pub seat_capacity: Option<i64>,
}

impl TryFrom<ClassEditRequest> for ClassEdit {
    type Error = Error;

    fn try_from(value: ClassEditRequest) -> Result<Self, Self::Error> {
        let title = match value.title {
            Some(title) if title.trim().is_empty() => {
                return Err(invalid_value_error(
                    FieldName::new("title"),
                    ClassValidationError::EmptyTitle,
                ));
            }
            other => other.map(|title| title.trim().to_owned()),
        };
        let seat_capacity = value
            .seat_capacity
            .map(seat_capacity_from)
            .transpose()
            .map_err(map_listing_validation_error)?;
        let price_cents = value
            .price_cents
            .map(price_cents_from)
            .transpose()
            .map_err(map_listing_validation_error)?;
        Ok(Self {
            title,
            image_url: value.image_url,
            price_cents,
            seat_capacity,
        })
    }
}

/// Body for `PATCH /classes/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: ClassStatus,
    #[serde(default)]
    pub feedback: Option<String>,
}

fn class_not_found() -> Error {
    Error::not_found("class not found")
}

fn map_listing_validation_error(err: ClassValidationError) -> Error {
    let field = match err {
        ClassValidationError::EmptyTitle => "title",
        ClassValidationError::EmptyInstructorName => "name",
        ClassValidationError::NegativeSeats | ClassValidationError::TooManySeats => {
            "seatCapacity"
        }
        ClassValidationError::PriceTooHigh => "priceCents",
        ClassValidationError::InvalidId => "id",
        ClassValidationError::UnknownStatus(_) => "status",
    };
    invalid_value_error(FieldName::new(field), err)
}

async fn load_listing(state: &HttpState, id: &ClassId) -> ApiResult<ClassListing> {
    state.classes.find(id).await?.ok_or_else(class_not_found)
}

/// Approved classes.
#[utoipa::path(
    get,
    path = "/classes",
    responses((status = 200, description = "Approved classes", body = [ClassListing])),
    tags = ["classes"],
    operation_id = "listApprovedClasses",
    security([])
)]
#[get("/classes")]
pub async fn list_classes(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<ClassListing>>> {
    Ok(web::Json(state.classes.list(ClassFilter::Approved).await?))
}

/// Approved classes ordered by enrollments, most popular first.
#[utoipa::path(
    get,
    path = "/classes/popular",
    params(PopularQuery),
    responses(
        (status = 200, description = "Popular classes", body = [ClassListing]),
        (status = 400, description = "Invalid limit", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "listPopularClasses",
    security([])
)]
#[get("/classes/popular")]
pub async fn popular_classes(
    state: web::Data<HttpState>,
    query: web::Query<PopularQuery>,
) -> ApiResult<web::Json<Vec<ClassListing>>> {
    let limit = query.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    if !(1..=MAX_POPULAR_LIMIT).contains(&limit) {
        return Err(invalid_value_error(
            FieldName::new("limit"),
            format!("limit must be between 1 and {MAX_POPULAR_LIMIT}"),
        ));
    }
    Ok(web::Json(state.classes.popular(limit).await?))
}

/// Every class regardless of status. Admin only.
#[utoipa::path(
    get,
    path = "/classes/all",
    responses(
        (status = 200, description = "All classes", body = [ClassListing]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "listAllClasses"
)]
#[get("/classes/all")]
pub async fn list_all_classes(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<ClassListing>>> {
    caller
        .require_role(state.users.as_ref(), UserRole::Admin)
        .await?;
    Ok(web::Json(state.classes.list(ClassFilter::All).await?))
}

/// Classes taught by an instructor.
#[utoipa::path(
    get,
    path = "/classes/instructor/{email}",
    params(("email" = String, Path, description = "Instructor email")),
    responses(
        (status = 200, description = "Instructor's classes", body = [ClassListing]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "listInstructorClasses"
)]
#[get("/classes/instructor/{email}")]
pub async fn instructor_classes(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ClassListing>>> {
    let email = parse_email(&path, FieldName::new("email"))?;
    caller
        .require_self_or_admin(state.users.as_ref(), &email)
        .await?;
    Ok(web::Json(
        state.classes.list(ClassFilter::Instructor(email)).await?,
    ))
}

/// A single class.
#[utoipa::path(
    get,
    path = "/classes/{id}",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "Class", body = ClassListing),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "getClass",
    security([])
)]
#[get("/classes/{id}")]
pub async fn get_class(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClassListing>> {
    let id = parse_class_id(&path, ID)?;
    Ok(web::Json(load_listing(&state, &id).await?))
}

/// Create a pending class. Instructor only.
#[utoipa::path(
    post,
    path = "/classes",
    request_body = NewClassRequest,
    responses(
        (status = 201, description = "Created", body = ClassListing),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "createClass"
)]
#[post("/classes")]
pub async fn create_class(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<NewClassRequest>,
) -> ApiResult<HttpResponse> {
    let instructor = caller
        .require_role(state.users.as_ref(), UserRole::Instructor)
        .await?;
    let NewClassRequest {
        title,
        image_url,
        price_cents,
        seat_capacity,
    } = payload.into_inner();
    let listing = NewClassListing::new(
        instructor.email,
        instructor.name,
        title,
        image_url,
        price_cents,
        seat_capacity,
    )
    .map_err(map_listing_validation_error)?
    .into_listing(ClassId::random());

    state.classes.insert(&listing).await?;
    info!(class_id = %listing.id, instructor = %listing.instructor_email, "class created");
    Ok(HttpResponse::Created().json(listing))
}

/// Edit a class. Owning instructor only.
#[utoipa::path(
    put,
    path = "/classes/{id}",
    params(("id" = String, Path, description = "Class id")),
    request_body = ClassEditRequest,
    responses(
        (status = 200, description = "Updated class", body = ClassListing),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "updateClass"
)]
#[put("/classes/{id}")]
pub async fn update_class(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ClassEditRequest>,
) -> ApiResult<web::Json<ClassListing>> {
    let id = parse_class_id(&path, ID)?;
    let edit = ClassEdit::try_from(payload.into_inner())?;
    let listing = load_listing(&state, &id).await?;
    caller.require_self(&listing.instructor_email)?;

    let updated = state
        .classes
        .update_details(&id, &edit)
        .await?
        .ok_or_else(class_not_found)?;
    info!(class_id = %id, "class updated");
    Ok(web::Json(updated))
}

/// Approve or deny a class. Admin only.
#[utoipa::path(
    patch,
    path = "/classes/{id}/status",
    params(("id" = String, Path, description = "Class id")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Updated class", body = ClassListing),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["classes"],
    operation_id = "setClassStatus"
)]
#[patch("/classes/{id}/status")]
pub async fn set_class_status(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StatusChangeRequest>,
) -> ApiResult<web::Json<ClassListing>> {
    let id = parse_class_id(&path, ID)?;
    caller
        .require_role(state.users.as_ref(), UserRole::Admin)
        .await?;
    let StatusChangeRequest { status, feedback } = payload.into_inner();
    let change = StatusChange {
        status,
        feedback: feedback.filter(|note| !note.trim().is_empty()),
    };
    let updated = state
        .classes
        .set_status(&id, &change)
        .await?
        .ok_or_else(class_not_found)?;
    info!(class_id = %id, status = updated.status.as_str(), "class moderated");
    Ok(web::Json(updated))
}

#[cfg(test)]
mod tests;
