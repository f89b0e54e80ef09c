//! Builders wiring persistence and provider adapters into HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use scholarlink::inbound::http::state::{HttpState, HttpStatePorts};
use scholarlink::outbound::identity::{FirebaseIdentityVerifier, IdentityCredentials};
use scholarlink::outbound::payments::StripeCheckoutGateway;
use scholarlink::outbound::persistence::{
    DbPool, DieselAnalyticsRepository, DieselApplicationRepository, DieselReviewRepository,
    DieselScholarshipRepository, DieselUserRepository,
};
use scholarlink::settings::Settings;

/// Build the production ports bundle: Diesel repositories over `pool`, the
/// Stripe checkout gateway and the identity toolkit verifier.
///
/// # Errors
/// Returns [`std::io::Error`] when the identity credentials cannot be loaded
/// or an outbound client cannot be constructed.
pub fn build_ports(settings: &Settings, pool: &DbPool) -> std::io::Result<HttpStatePorts> {
    let payments = StripeCheckoutGateway::new(
        &settings.stripe_api_base,
        settings.stripe_secret_key.clone(),
        settings.http_client_timeout,
    )
    .map_err(|e| std::io::Error::other(format!("payment gateway setup failed: {e}")))?;
    let credentials = IdentityCredentials::load(&settings.identity_credentials_file)
        .map_err(std::io::Error::other)?;
    let identity = FirebaseIdentityVerifier::new(
        &settings.identity_verifier_url,
        &credentials,
        settings.http_client_timeout,
    )
    .map_err(|e| std::io::Error::other(format!("identity verifier setup failed: {e}")))?;

    Ok(HttpStatePorts {
        scholarships: Arc::new(DieselScholarshipRepository::new(pool.clone())),
        applications: Arc::new(DieselApplicationRepository::new(pool.clone())),
        reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        analytics: Arc::new(DieselAnalyticsRepository::new(pool.clone())),
        payments: Arc::new(payments),
        identity: Arc::new(identity),
        clock: Arc::new(DefaultClock),
        client_url: settings.client_url.to_string(),
    })
}

/// Wrap the services built over `ports` for sharing across workers.
pub fn build_http_state(ports: HttpStatePorts) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(ports))
}
