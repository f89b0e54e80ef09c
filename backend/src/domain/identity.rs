//! Bearer credential extraction and verification.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::Error;
use crate::domain::ports::{IdentityVerifier, IdentityVerifierError, VerifiedIdentity};

const BEARER_SCHEME: &str = "Bearer";

/// An opaque bearer token. The value is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Extract the token from an `Authorization` header value.
    ///
    /// Returns `None` for a missing header, another scheme, or an empty
    /// token.
    ///
    /// # Examples
    /// ```
    /// use scholarlink::domain::BearerToken;
    ///
    /// assert!(BearerToken::from_authorization(Some("Bearer abc")).is_some());
    /// assert!(BearerToken::from_authorization(Some("Basic abc")).is_none());
    /// assert!(BearerToken::from_authorization(None).is_none());
    /// ```
    pub fn from_authorization(header: Option<&str>) -> Option<Self> {
        let (scheme, token) = header?.trim().split_once(' ')?;
        let token = token.trim();
        (scheme == BEARER_SCHEME && !token.is_empty()).then(|| Self(token.to_owned()))
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Guards privileged endpoints with one verifier round trip per request.
#[derive(Clone)]
pub struct IdentityGate {
    verifier: Arc<dyn IdentityVerifier>,
}

impl IdentityGate {
    /// Create the gate over a verifier.
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Verify the caller. A missing or non-bearer credential is rejected
    /// without contacting the verifier.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<VerifiedIdentity, Error> {
        let Some(token) = BearerToken::from_authorization(authorization) else {
            debug!("request without bearer credential");
            return Err(Error::unauthorized("missing bearer credential"));
        };
        self.verifier.verify(&token).await.map_err(|err| match err {
            IdentityVerifierError::Rejected { message } => {
                debug!(%message, "identity token rejected");
                Error::unauthorized("invalid bearer credential")
            }
            IdentityVerifierError::Transport { message }
            | IdentityVerifierError::Timeout { message } => {
                warn!(%message, "identity provider unreachable");
                Error::service_unavailable(format!("identity provider unavailable: {message}"))
            }
            IdentityVerifierError::Decode { message } => {
                Error::internal(format!("identity provider response invalid: {message}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockIdentityVerifier;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer   "))]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("bearer token"))]
    #[tokio::test]
    async fn missing_or_foreign_scheme_short_circuits(#[case] header: Option<&str>) {
        let mut verifier = MockIdentityVerifier::new();
        verifier.expect_verify().never();
        let err = IdentityGate::new(Arc::new(verifier))
            .authenticate(header)
            .await
            .expect_err("unauthorised");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(IdentityVerifierError::rejected("expired"), ErrorCode::Unauthorized)]
    #[case(IdentityVerifierError::transport("dns"), ErrorCode::ServiceUnavailable)]
    #[case(IdentityVerifierError::decode("not json"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn verifier_failures_map_to_domain_codes(
        #[case] failure: IdentityVerifierError,
        #[case] expected: ErrorCode,
    ) {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_verify()
            .times(1)
            .returning(move |_| Err(failure.clone()));
        let err = IdentityGate::new(Arc::new(verifier))
            .authenticate(Some("Bearer abc"))
            .await
            .expect_err("verifier failure");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn valid_token_passes_through() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_verify()
            .withf(|token| token.expose() == "abc")
            .returning(|_| {
                Ok(VerifiedIdentity {
                    subject: "uid-1".to_owned(),
                    email: None,
                })
            });
        let identity = IdentityGate::new(Arc::new(verifier))
            .authenticate(Some("Bearer abc"))
            .await
            .expect("verified");
        assert_eq!(identity.subject, "uid-1");
    }

    #[rstest]
    fn debug_hides_token() {
        let token = BearerToken::from_authorization(Some("Bearer secret")).expect("token");
        assert_eq!(format!("{token:?}"), "BearerToken(..)");
    }
}
