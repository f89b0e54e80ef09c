//! Identity provider outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `IdentityVerifier` port backed by the Firebase identity toolkit.

mod credentials;
mod dto;
mod firebase_lookup;

pub use credentials::{IdentityCredentials, IdentityCredentialsError};
pub use firebase_lookup::{DEFAULT_IDENTITY_VERIFIER_URL, FirebaseIdentityVerifier};
