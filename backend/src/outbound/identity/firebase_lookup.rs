//! Reqwest-backed identity verifier using the identity toolkit
//! `accounts:lookup` endpoint.
//!
//! The provider answers `400 INVALID_ID_TOKEN` (or `TOKEN_EXPIRED`,
//! `USER_NOT_FOUND`) for credentials it does not accept; those become
//! [`IdentityVerifierError::Rejected`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::credentials::IdentityCredentials;
use super::dto::{LookupRequestDto, LookupResponseDto, ProviderErrorEnvelopeDto};
use crate::domain::BearerToken;
use crate::domain::ports::{IdentityVerifier, IdentityVerifierError, VerifiedIdentity};

/// Public identity toolkit base URL.
pub const DEFAULT_IDENTITY_VERIFIER_URL: &str = "https://identitytoolkit.googleapis.com";

const LOOKUP_PATH: &str = "v1/accounts:lookup";

/// Verifies bearer tokens with one `accounts:lookup` round trip.
pub struct FirebaseIdentityVerifier {
    client: Client,
    endpoint: Url,
}

impl FirebaseIdentityVerifier {
    /// Build a verifier against `base` using the credential's API key.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot be derived from `base` or
    /// the reqwest client cannot be constructed.
    pub fn new(
        base: &Url,
        credentials: &IdentityCredentials,
        timeout: Duration,
    ) -> Result<Self, IdentityVerifierError> {
        let endpoint = lookup_endpoint(base, &credentials.api_key)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| IdentityVerifierError::transport(err.to_string()))?;
        Ok(Self { client, endpoint })
    }
}

fn lookup_endpoint(base: &Url, api_key: &str) -> Result<Url, IdentityVerifierError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let mut endpoint = base.join(LOOKUP_PATH).map_err(|err| {
        IdentityVerifierError::transport(format!("invalid identity verifier url: {err}"))
    })?;
    endpoint.query_pairs_mut().append_pair("key", api_key);
    Ok(endpoint)
}

#[async_trait]
impl IdentityVerifier for FirebaseIdentityVerifier {
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedIdentity, IdentityVerifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&LookupRequestDto {
                id_token: token.expose(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_identity(body.as_ref())
    }
}

fn parse_identity(body: &[u8]) -> Result<VerifiedIdentity, IdentityVerifierError> {
    let decoded: LookupResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityVerifierError::decode(format!("invalid lookup payload: {error}"))
    })?;
    decoded
        .into_identity()
        .map_err(IdentityVerifierError::decode)?
        .ok_or_else(|| IdentityVerifierError::rejected("token matched no account"))
}

fn map_transport_error(error: reqwest::Error) -> IdentityVerifierError {
    if error.is_timeout() {
        IdentityVerifierError::timeout(error.to_string())
    } else {
        IdentityVerifierError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityVerifierError {
    let message = serde_json::from_slice::<ProviderErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| format!("status {}", status.as_u16()));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityVerifierError::rejected(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityVerifierError::timeout(message)
        }
        _ => IdentityVerifierError::transport(message),
    }
}
