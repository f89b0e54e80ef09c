//! Hosted checkout handler.
//!
//! ```text
//! POST /create-checkout-session {"scholarshipId":"…","userEmail":"…","userName":"…"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CheckoutInput;
use crate::domain::ports::CheckoutSession;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Checkout request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub scholarship_id: Option<String>,
    #[schema(example = "ada@example.com")]
    pub user_email: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub user_name: Option<String>,
}

/// Session the client redirects to.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionBody {
    #[schema(example = "cs_test_a1b2c3")]
    pub id: String,
    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1b2c3")]
    pub url: String,
}

impl From<CheckoutSession> for CheckoutSessionBody {
    fn from(session: CheckoutSession) -> Self {
        Self {
            id: session.id,
            url: session.url,
        }
    }
}

/// Open a hosted checkout session for a scholarship's fees.
#[utoipa::path(
    post,
    path = "/create-checkout-session",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Session created", body = CheckoutSessionBody),
        (status = 400, description = "Invalid request or nothing to charge", body = ErrorSchema),
        (status = 404, description = "Unknown scholarship", body = ErrorSchema),
        (status = 503, description = "Payment provider unavailable", body = ErrorSchema)
    ),
    tags = ["checkout"],
    operation_id = "createCheckoutSession"
)]
#[post("/create-checkout-session")]
pub async fn create_checkout_session(
    state: web::Data<HttpState>,
    payload: web::Json<CheckoutRequest>,
) -> ApiResult<HttpResponse> {
    let CheckoutRequest {
        scholarship_id,
        user_email,
        user_name,
    } = payload.into_inner();
    let session = state
        .checkout
        .start(CheckoutInput {
            scholarship_id,
            user_email,
            user_name,
        })
        .await?;
    Ok(envelope::ok(CheckoutSessionBody::from(session)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::PaymentGatewayError;
    use crate::domain::{FeeAmount, Scholarship, ScholarshipDraft};
    use crate::inbound::http::test_utils::{json_body, test_app};
    use crate::test_support::{TestHarness, draft};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn harness() -> TestHarness {
        TestHarness::new()
    }

    fn seed(harness: &TestHarness, application_fee: f64, service_charge: f64) -> Scholarship {
        harness.seed_scholarship(ScholarshipDraft {
            application_fees: Some(FeeAmount::new(application_fee).expect("fee")),
            service_charge: Some(FeeAmount::new(service_charge).expect("fee")),
            ..draft("Oxford Merit Award", "University of Oxford")
        })
    }

    fn checkout(scholarship: &Scholarship) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/create-checkout-session")
            .set_json(json!({
                "scholarshipId": scholarship.id.to_string(),
                "userEmail": "ada@example.com",
                "userName": "Ada"
            }))
    }

    #[rstest]
    #[actix_web::test]
    async fn session_charges_fee_plus_service_charge(harness: TestHarness) {
        let scholarship = seed(&harness, 49.99, 10.0);
        let app = actix_test::init_service(test_app(harness.state())).await;
        let response = actix_test::call_service(&app, checkout(&scholarship).to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value = json_body(response).await;
        assert_eq!(value["data"]["id"], "cs_test_1");

        let requests = harness.payments.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.amount_minor, 5999);
        assert_eq!(
            request.cancel_url,
            format!(
                "https://app.scholarlink.test/payment-failed?scholarshipId={}",
                scholarship.id
            )
        );
        assert!(
            request
                .success_url
                .contains("session_id={CHECKOUT_SESSION_ID}")
        );
        assert_eq!(
            request.metadata.get("userEmail").map(String::as_str),
            Some("ada@example.com")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn zero_charge_is_invalid(harness: TestHarness) {
        let scholarship = seed(&harness, 0.0, 0.0);
        let app = actix_test::init_service(test_app(harness.state())).await;
        let response = actix_test::call_service(&app, checkout(&scholarship).to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(harness.payments.requests().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn provider_outage_is_service_unavailable(harness: TestHarness) {
        let scholarship = seed(&harness, 20.0, 5.0);
        harness
            .payments
            .fail_with(PaymentGatewayError::transport("connection refused"));
        let app = actix_test::init_service(test_app(harness.state())).await;
        let response = actix_test::call_service(&app, checkout(&scholarship).to_request()).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
