//! User profile handlers.
//!
//! ```text
//! PUT /users/{email} {"name":"Ada","photoUrl":null}
//! GET /users/{email}
//! GET /users/{email}/role
//! GET /users
//! PATCH /users/{email}/role {"role":"instructor"}
//! GET /instructors
//! ```

use actix_web::{get, patch, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, User, UserRole, UserUpsert, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

const EMAIL: FieldName = FieldName::new("email");

/// Profile body for `PUT /users/{email}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Only `student` and `instructor` may be self-assigned.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Body for role reads and changes.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleBody {
    pub role: UserRole,
}

fn map_profile_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyName => "name",
        UserValidationError::UnknownRole(_) => "role",
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn user_not_found() -> Error {
    Error::not_found("user not found")
}

/// Create or refresh a user profile.
///
/// Creating a profile is public. Refreshing an existing one needs the
/// owner's bearer token, and never changes the stored role.
#[utoipa::path(
    put,
    path = "/users/{email}",
    params(("email" = String, Path, description = "User email")),
    request_body = UserProfileRequest,
    responses(
        (status = 200, description = "Stored profile", body = User),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Existing profile needs a token", body = ErrorSchema),
        (status = 403, description = "Role may not be self-assigned", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "upsertUser",
    security((), ("BearerToken" = []))
)]
#[put("/users/{email}")]
pub async fn upsert_user(
    caller: Option<AuthenticatedUser>,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserProfileRequest>,
) -> ApiResult<web::Json<User>> {
    let email = parse_email(&path, EMAIL)?;
    let UserProfileRequest {
        name,
        photo_url,
        role,
    } = payload.into_inner();
    if role == Some(UserRole::Admin) {
        return Err(Error::forbidden("forbidden access"));
    }
    let profile =
        UserUpsert::new(email, name, photo_url, role).map_err(map_profile_validation_error)?;
    if state.users.find_by_email(&profile.email).await?.is_some() {
        caller
            .ok_or_else(|| Error::unauthorized("unauthorized access"))?
            .require_self(&profile.email)?;
    }
    let user = state.users.upsert(profile).await?;
    info!(email = %user.email, role = %user.role, "user profile saved");
    Ok(web::Json(user))
}

/// Fetch a user profile.
#[utoipa::path(
    get,
    path = "/users/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User profile", body = User),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{email}")]
pub async fn get_user(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let email = parse_email(&path, EMAIL)?;
    caller
        .require_self_or_admin(state.users.as_ref(), &email)
        .await?;
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(web::Json(user))
}

/// Fetch a user's role.
#[utoipa::path(
    get,
    path = "/users/{email}/role",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Role", body = RoleBody),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserRole"
)]
#[get("/users/{email}/role")]
pub async fn get_user_role(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RoleBody>> {
    let email = parse_email(&path, EMAIL)?;
    caller
        .require_self_or_admin(state.users.as_ref(), &email)
        .await?;
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(web::Json(RoleBody { role: user.role }))
}

/// List every user. Admin only.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<User>>> {
    caller
        .require_role(state.users.as_ref(), UserRole::Admin)
        .await?;
    Ok(web::Json(state.users.list(None).await?))
}

/// Change a user's role. Admin only.
#[utoipa::path(
    patch,
    path = "/users/{email}/role",
    params(("email" = String, Path, description = "User email")),
    request_body = RoleBody,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setUserRole"
)]
#[patch("/users/{email}/role")]
pub async fn set_user_role(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RoleBody>,
) -> ApiResult<web::Json<User>> {
    let email = parse_email(&path, EMAIL)?;
    let admin = caller
        .require_role(state.users.as_ref(), UserRole::Admin)
        .await?;
    let user = state
        .users
        .set_role(&email, payload.role)
        .await?
        .ok_or_else(user_not_found)?;
    info!(email = %user.email, role = %user.role, by = %admin.email, "user role changed");
    Ok(web::Json(user))
}

/// List instructors.
#[utoipa::path(
    get,
    path = "/instructors",
    responses((status = 200, description = "Instructors", body = [User])),
    tags = ["users"],
    operation_id = "listInstructors",
    security([])
)]
#[get("/instructors")]
pub async fn list_instructors(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users.list(Some(UserRole::Instructor)).await?))
}
