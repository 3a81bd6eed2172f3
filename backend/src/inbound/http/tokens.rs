//! Access token issuance.
//!
//! ```text
//! POST /jwt {"email":"ada@example.com"}
//! ```
//!
//! Tokens are signed for whichever email the caller submits; nothing here
//! proves the caller owns that address. Identity verification belongs to
//! the client's sign-in provider, so `require_self` and `require_role`
//! checks only hold against callers who cannot guess another user's email.
//! Deployments that need a real boundary must put an authenticating proxy
//! in front of this route.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

/// Request body for `POST /jwt`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Signed bearer token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
}

/// Issue a bearer token for the given email.
#[utoipa::path(
    post,
    path = "/jwt",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid email", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "issueToken",
    security([])
)]
#[post("/jwt")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let email = parse_email(&payload.email, FieldName::new("email"))?;
    let token = state
        .tokens
        .issue(&email)
        .map_err(|err| Error::internal(err.to_string()))?;
    info!(email = %email, ttl_secs = state.tokens.ttl().as_secs(), "access token issued");
    Ok(web::Json(TokenResponse {
        token: token.as_str().to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::inbound::http::test_utils::{
        StateBuilder, email, init_app, send, users_with_roles,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn issued_tokens_verify_for_the_normalised_email() {
        let state = StateBuilder::default().build();
        let tokens = state.tokens.clone();
        let app = init_app(state).await;

        let (status, body) = send(
            &app,
            actix_test::TestRequest::post()
                .uri("/jwt")
                .set_json(json!({ "email": "  Ada@Example.com " })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().expect("token string");
        assert_eq!(tokens.verify(token), Ok(email("ada@example.com")));
    }

    #[actix_web::test]
    async fn tokens_are_issued_for_any_submitted_email() {
        let state = StateBuilder::default()
            .users(users_with_roles(&[("root@example.com", UserRole::Admin)]))
            .build();
        let tokens = state.tokens.clone();
        let app = init_app(state).await;

        let (status, body) = send(
            &app,
            actix_test::TestRequest::post()
                .uri("/jwt")
                .set_json(json!({ "email": "root@example.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().expect("token string");
        assert_eq!(tokens.verify(token), Ok(email("root@example.com")));
    }

    #[actix_web::test]
    async fn malformed_emails_are_rejected() {
        let app = init_app(StateBuilder::default().build()).await;
        let (status, body) = send(
            &app,
            actix_test::TestRequest::post()
                .uri("/jwt")
                .set_json(json!({ "email": "nobody" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], Value::from("email"));
    }
}
