//! Provider and clock doubles.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CheckoutSession, CheckoutSessionRequest, IdentityVerifier, IdentityVerifierError,
    PaymentGateway, PaymentGatewayError, VerifiedIdentity,
};
use crate::domain::{BearerToken, Email};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock whose time only moves when told to.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Current instant.
    pub fn now(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *lock(&self.0) = now;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now()
    }
}

/// Payment provider stub that records every session request.
#[derive(Default)]
pub struct StubPaymentGateway {
    requests: Mutex<Vec<CheckoutSessionRequest>>,
    failure: Mutex<Option<PaymentGatewayError>>,
}

impl StubPaymentGateway {
    /// Fail every subsequent call with `error`.
    pub fn fail_with(&self, error: PaymentGatewayError) {
        *lock(&self.failure) = Some(error);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        if let Some(error) = lock(&self.failure).clone() {
            return Err(error);
        }
        let mut requests = lock(&self.requests);
        requests.push(request.clone());
        let id = format!("cs_test_{}", requests.len());
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.test/pay/{id}"),
            id,
        })
    }
}

/// Identity stub backed by a token table.
#[derive(Default)]
pub struct StubIdentityVerifier {
    accepted: Mutex<HashMap<String, VerifiedIdentity>>,
    outage: Mutex<Option<IdentityVerifierError>>,
}

impl StubIdentityVerifier {
    /// Accept `token` as the account `email`.
    pub fn accepting(token: &str, email: &str) -> Self {
        let verifier = Self::default();
        verifier.accept(token, email);
        verifier
    }

    pub fn accept(&self, token: &str, email: &str) {
        let identity = VerifiedIdentity {
            subject: format!("uid-{token}"),
            email: Email::new(email).ok(),
        };
        lock(&self.accepted).insert(token.to_owned(), identity);
    }

    /// Fail every subsequent verification with `error`.
    pub fn fail_with(&self, error: IdentityVerifierError) {
        *lock(&self.outage) = Some(error);
    }
}

#[async_trait]
impl IdentityVerifier for StubIdentityVerifier {
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedIdentity, IdentityVerifierError> {
        if let Some(error) = lock(&self.outage).clone() {
            return Err(error);
        }
        lock(&self.accepted)
            .get(token.expose())
            .cloned()
            .ok_or_else(|| IdentityVerifierError::rejected("INVALID_ID_TOKEN"))
    }
}
