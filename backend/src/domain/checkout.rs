//! Hosted checkout for application fees.
//!
//! The charge is the scholarship's application fee plus service charge,
//! converted to US cents. The provider substitutes the literal
//! `{CHECKOUT_SESSION_ID}` placeholder in the success URL.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::application_reconciler::{SCHOLARSHIP_ID, USER_EMAIL, parse_email};
use crate::domain::ports::{
    CheckoutSession, CheckoutSessionRequest, PaymentGateway, PaymentGatewayError,
    ScholarshipRepository,
};
use crate::domain::scholarship_catalogue::{
    map_scholarship_error, parse_scholarship_id, scholarship_not_found,
};
use crate::domain::validation::{FieldName, invalid_value_error, require_text};
use crate::domain::{Error, Scholarship};

/// Currency charged for every checkout.
pub const CHECKOUT_CURRENCY: &str = "usd";

const USER_NAME: FieldName = FieldName::new("userName");

fn map_payment_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Transport { message } | PaymentGatewayError::Timeout { message } => {
            Error::service_unavailable(format!("payment provider unavailable: {message}"))
        }
        other => Error::internal(format!("payment provider error: {other}")),
    }
}

/// Amount owed for one application, in minor units.
pub fn charge_in_cents(scholarship: &Scholarship) -> u64 {
    let total = scholarship.application_fee_or_zero().value()
        + scholarship.service_charge_or_zero().value();
    // Fees are validated finite and non-negative.
    (total * 100.0).round() as u64
}

/// Unvalidated checkout request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutInput {
    pub scholarship_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
}

/// Creates hosted checkout sessions.
#[derive(Clone)]
pub struct CheckoutService {
    scholarships: Arc<dyn ScholarshipRepository>,
    payments: Arc<dyn PaymentGateway>,
    client_url: String,
}

impl CheckoutService {
    /// Create the service. `client_url` is the front-end origin used for the
    /// success and cancel redirects.
    pub fn new(
        scholarships: Arc<dyn ScholarshipRepository>,
        payments: Arc<dyn PaymentGateway>,
        client_url: impl Into<String>,
    ) -> Self {
        let client_url: String = client_url.into();
        Self {
            scholarships,
            payments,
            client_url: client_url.trim_end_matches('/').to_owned(),
        }
    }

    fn success_url(&self, scholarship: &Scholarship) -> String {
        format!(
            "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}&scholarshipId={}",
            self.client_url, scholarship.id
        )
    }

    fn cancel_url(&self, scholarship: &Scholarship) -> String {
        format!(
            "{}/payment-failed?scholarshipId={}",
            self.client_url, scholarship.id
        )
    }

    /// Validate, price and open a checkout session.
    pub async fn start(&self, input: CheckoutInput) -> Result<CheckoutSession, Error> {
        let scholarship_id = parse_scholarship_id(
            &require_text(input.scholarship_id, SCHOLARSHIP_ID)?,
            SCHOLARSHIP_ID,
        )?;
        let user_email = parse_email(require_text(input.user_email, USER_EMAIL)?, USER_EMAIL)?;
        let user_name = require_text(input.user_name, USER_NAME)?;

        let scholarship = self
            .scholarships
            .find_by_id(&scholarship_id)
            .await
            .map_err(map_scholarship_error)?
            .ok_or_else(|| scholarship_not_found(&scholarship_id))?;

        let amount_minor = charge_in_cents(&scholarship);
        if amount_minor == 0 {
            return Err(invalid_value_error(
                SCHOLARSHIP_ID,
                "scholarship has no fee to charge",
            ));
        }

        let request = CheckoutSessionRequest {
            amount_minor,
            currency: CHECKOUT_CURRENCY.to_owned(),
            product_name: scholarship.scholarship_name.clone(),
            customer_email: user_email.to_string(),
            success_url: self.success_url(&scholarship),
            cancel_url: self.cancel_url(&scholarship),
            metadata: BTreeMap::from([
                ("scholarshipId".to_owned(), scholarship.id.to_string()),
                ("userEmail".to_owned(), user_email.to_string()),
                ("userName".to_owned(), user_name),
            ]),
        };
        let session = self
            .payments
            .create_checkout_session(&request)
            .await
            .map_err(map_payment_error)?;
        info!(
            session_id = %session.id,
            scholarship_id = %scholarship.id,
            amount_minor,
            "checkout session created"
        );
        Ok(session)
    }
}
