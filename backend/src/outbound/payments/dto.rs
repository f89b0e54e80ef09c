//! DTOs for decoding Stripe API responses.

use serde::Deserialize;

use crate::domain::ports::CheckoutSession;

#[derive(Debug, Deserialize)]
pub(super) struct CheckoutSessionDto {
    pub(super) id: String,
    pub(super) url: Option<String>,
}

impl CheckoutSessionDto {
    pub(super) fn into_session(self) -> Result<CheckoutSession, String> {
        let url = self
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| format!("checkout session {} has no hosted url", self.id))?;
        Ok(CheckoutSession { id: self.id, url })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeErrorEnvelopeDto {
    pub(super) error: StripeErrorDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeErrorDto {
    #[serde(rename = "type")]
    pub(super) kind: Option<String>,
    pub(super) message: Option<String>,
}
