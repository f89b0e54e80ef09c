//! Reqwest-backed Stripe Checkout adapter.
//!
//! This adapter owns transport details only: form encoding of the session
//! parameters, timeout and HTTP error mapping, and JSON decoding of the
//! created session. Pricing and redirect URLs arrive ready-made from the
//! domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{CheckoutSessionDto, StripeErrorEnvelopeDto};
use crate::domain::ports::{
    CheckoutSession, CheckoutSessionRequest, PaymentGateway, PaymentGatewayError,
};

const CHECKOUT_SESSIONS_PATH: &str = "v1/checkout/sessions";

/// Payment gateway that creates hosted Stripe Checkout sessions.
pub struct StripeCheckoutGateway {
    client: Client,
    endpoint: Url,
    secret_key: String,
}

impl StripeCheckoutGateway {
    /// Build a gateway against `api_base` (normally `https://api.stripe.com`).
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot be derived from `api_base`
    /// or the reqwest client cannot be constructed.
    pub fn new(
        api_base: &Url,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PaymentGatewayError> {
        let endpoint = checkout_endpoint(api_base)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PaymentGatewayError::transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            secret_key: secret_key.into(),
        })
    }
}

fn checkout_endpoint(api_base: &Url) -> Result<Url, PaymentGatewayError> {
    let mut base = api_base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(CHECKOUT_SESSIONS_PATH)
        .map_err(|err| PaymentGatewayError::transport(format!("invalid payment api base: {err}")))
}

/// Stripe's bracketed form encoding for one-line-item payment sessions.
fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("payment_method_types[0]".to_owned(), "card".to_owned()),
        ("customer_email".to_owned(), request.customer_email.clone()),
        ("line_items[0][quantity]".to_owned(), "1".to_owned()),
        (
            "line_items[0][price_data][currency]".to_owned(),
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_owned(),
            request.amount_minor.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_owned(),
            request.product_name.clone(),
        ),
        ("success_url".to_owned(), request.success_url.clone()),
        ("cancel_url".to_owned(), request.cancel_url.clone()),
    ];
    form.extend(
        request
            .metadata
            .iter()
            .map(|(key, value)| (format!("metadata[{key}]"), value.clone())),
    );
    form
}

#[async_trait]
impl PaymentGateway for StripeCheckoutGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.secret_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&session_form(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_session(body.as_ref())
    }
}

fn parse_session(body: &[u8]) -> Result<CheckoutSession, PaymentGatewayError> {
    let decoded: CheckoutSessionDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid checkout session payload: {error}"))
    })?;
    decoded.into_session().map_err(PaymentGatewayError::decode)
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let message = serde_json::from_slice::<StripeErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| match (envelope.error.kind, envelope.error.message) {
            (Some(kind), Some(message)) => Some(format!("{kind}: {message}")),
            (None, Some(message)) => Some(message),
            (Some(kind), None) => Some(kind),
            (None, None) => None,
        })
        .unwrap_or_else(|| format!("status {}", status.as_u16()));

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ if status.is_client_error() => PaymentGatewayError::rejected(status.as_u16(), message),
        _ => PaymentGatewayError::transport(message),
    }
}
