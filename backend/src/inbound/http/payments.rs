//! Payment intent creation.
//!
//! ```text
//! POST /create-payment-intent {"price": 45.5}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Currency, Error, PaymentAmount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

/// Body for `POST /create-payment-intent`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    /// Price in dollars; converted to cents.
    #[schema(example = 45.5)]
    pub price: f64,
}

/// Client secret handed to the payment form.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// Create a USD payment intent.
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Intent created", body = PaymentIntentResponse),
        (status = 400, description = "Invalid price or rejected by provider", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Provider unavailable", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "createPaymentIntent"
)]
#[post("/create-payment-intent")]
pub async fn create_payment_intent(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<PaymentIntentRequest>,
) -> ApiResult<web::Json<PaymentIntentResponse>> {
    let amount = PaymentAmount::from_price(payload.price)
        .map_err(|err| invalid_value_error(FieldName::new("price"), err))?;
    let secret = state
        .payments
        .create_intent(amount, Currency::Usd)
        .await
        .map_err(Error::from)?;
    info!(
        amount_cents = amount.minor_units(),
        payer = %caller.email(),
        "payment intent created"
    );
    Ok(web::Json(PaymentIntentResponse {
        client_secret: secret.expose().to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClientSecret;
    use crate::domain::ports::{MockPaymentGateway, PaymentGatewayError};
    use crate::inbound::http::test_utils::{StateBuilder, bearer, init_app, send};
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn request_intent(gateway: MockPaymentGateway, price: Value) -> (StatusCode, Value) {
        let state = StateBuilder::default().payments(gateway).build();
        let token = bearer(&state, "ada@example.com");
        let app = init_app(state).await;
        send(
            &app,
            actix_test::TestRequest::post()
                .uri("/create-payment-intent")
                .insert_header((header::AUTHORIZATION, token))
                .set_json(json!({ "price": price })),
        )
        .await
    }

    #[actix_web::test]
    async fn prices_are_sent_in_cents() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_intent()
            .withf(|amount, currency| amount.minor_units() == 4_550 && *currency == Currency::Usd)
            .times(1)
            .returning(|_, _| Ok(ClientSecret::new("pi_1_secret_2")));

        let (status, body) = request_intent(gateway, json!(45.5)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "clientSecret": "pi_1_secret_2" }));
    }

    #[rstest]
    #[case(json!(0))]
    #[case(json!(-3.5))]
    #[actix_web::test]
    async fn non_positive_prices_are_rejected(#[case] price: Value) {
        let (status, body) = request_intent(MockPaymentGateway::new(), price).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], Value::from("price"));
    }

    #[rstest]
    #[case(PaymentGatewayError::transport("timeout"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(PaymentGatewayError::rejected(402_u16, "card declined"), StatusCode::BAD_REQUEST)]
    #[case(PaymentGatewayError::decode("missing client_secret"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[actix_web::test]
    async fn provider_failures_map_to_status_codes(
        #[case] failure: PaymentGatewayError,
        #[case] expected: StatusCode,
    ) {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_intent()
            .times(1)
            .return_once(move |_, _| Err(failure));

        let (status, body) = request_intent(gateway, json!(10)).await;

        assert_eq!(status, expected);
        assert_eq!(body["error"], Value::Bool(true));
    }
}
