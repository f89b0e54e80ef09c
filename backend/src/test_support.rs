//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for tests and behind the
//! `test-support` feature.
//!
//! [`TestHarness`] wires an [`InMemoryStore`], provider stubs and a
//! [`ManualClock`] into the same [`HttpStatePorts`] bundle the server builds
//! from Postgres and the live providers.

mod doubles;
mod store;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{Email, NewUser, Scholarship, ScholarshipDraft, User};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub use doubles::{ManualClock, StubIdentityVerifier, StubPaymentGateway};
pub use store::InMemoryStore;

/// Bearer token accepted by the harness identity stub.
pub const VALID_TOKEN: &str = "valid-token";

/// Fixed start time for harness clocks.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// In-memory wiring of every port.
#[derive(Clone)]
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub payments: Arc<StubPaymentGateway>,
    pub identity: Arc<StubIdentityVerifier>,
    pub clock: Arc<ManualClock>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Empty store, a payment stub that succeeds and an identity stub that
    /// accepts [`VALID_TOKEN`].
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::default()),
            payments: Arc::new(StubPaymentGateway::default()),
            identity: Arc::new(StubIdentityVerifier::accepting(
                VALID_TOKEN,
                "admin@scholarlink.test",
            )),
            clock: Arc::new(ManualClock::new(epoch())),
        }
    }

    /// Port bundle for [`HttpState::new`].
    pub fn ports(&self, client_url: &str) -> HttpStatePorts {
        HttpStatePorts {
            scholarships: self.store.clone(),
            applications: self.store.clone(),
            reviews: self.store.clone(),
            users: self.store.clone(),
            analytics: self.store.clone(),
            payments: self.payments.clone(),
            identity: self.identity.clone(),
            clock: self.clock.clone(),
            client_url: client_url.to_owned(),
        }
    }

    /// Wired services with a fixed client origin.
    pub fn state(&self) -> HttpState {
        HttpState::new(self.ports("https://app.scholarlink.test"))
    }

    /// Store a scholarship posted at the current clock time. The clock moves
    /// forward one second afterwards so successive seeds have distinct post
    /// dates.
    pub fn seed_scholarship(&self, draft: ScholarshipDraft) -> Scholarship {
        let scholarship = draft.publish(self.clock.now());
        self.store.put_scholarship(scholarship.clone());
        self.clock.advance_seconds(1);
        scholarship
    }

    /// Store a user created at the current clock time.
    pub fn seed_user(&self, email: &str, name: Option<&str>) -> User {
        let user = NewUser {
            email: Email::new(email).unwrap_or_else(|err| panic!("seed email {email}: {err}")),
            name: name.map(str::to_owned),
            photo_url: None,
        }
        .into_user(self.clock.now());
        self.store.put_user(user.clone());
        self.clock.advance_seconds(1);
        user
    }
}

/// A complete draft with sensible defaults; override fields as needed.
pub fn draft(scholarship_name: &str, university_name: &str) -> ScholarshipDraft {
    ScholarshipDraft {
        scholarship_name: scholarship_name.to_owned(),
        university_name: university_name.to_owned(),
        university_image: None,
        university_country: "United Kingdom".to_owned(),
        university_city: None,
        university_world_rank: None,
        subject_category: "Engineering".to_owned(),
        scholarship_category: "Full fund".to_owned(),
        degree: "Masters".to_owned(),
        tuition_fees: None,
        application_fees: None,
        service_charge: None,
        application_deadline: None,
        posted_by: None,
    }
}
