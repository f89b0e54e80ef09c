//! Driven port for verifying bearer identity tokens.

use async_trait::async_trait;

use crate::domain::{BearerToken, Email};

use super::define_port_error;

/// Identity asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider-assigned subject identifier.
    pub subject: String,
    pub email: Option<Email>,
}

define_port_error! {
    /// Errors surfaced while verifying a token.
    pub enum IdentityVerifierError {
        /// The provider reports the token as invalid or expired.
        Rejected { message: String } =>
            "identity token rejected: {message}",
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The provider call exceeded its timeout.
        Timeout { message: String } =>
            "identity provider timeout: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } =>
            "identity provider response decode failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a token with one provider round trip.
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedIdentity, IdentityVerifierError>;
}
