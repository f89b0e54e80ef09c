//! Driven port for the hosted checkout provider.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::define_port_error;

/// A hosted checkout session to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    /// Charge in minor currency units.
    pub amount_minor: u64,
    /// ISO 4217 currency code, lowercase.
    pub currency: String,
    /// Line item name shown on the hosted page.
    pub product_name: String,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: BTreeMap<String, String>,
}

/// A created checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page the client redirects to.
    pub url: String,
}

define_port_error! {
    /// Errors surfaced while calling the payment provider.
    pub enum PaymentGatewayError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "payment provider transport failed: {message}",
        /// The provider call exceeded its timeout.
        Timeout { message: String } =>
            "payment provider timeout: {message}",
        /// The provider refused the request.
        Rejected { status: u16, message: String } =>
            "payment provider rejected request with status {status}: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } =>
            "payment provider response decode failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError>;
}
