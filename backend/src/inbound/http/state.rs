//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AnalyticsRepository, ApplicationRepository, IdentityVerifier, PaymentGateway,
    ReviewRepository, ScholarshipRepository, UserRepository,
};
use crate::domain::{
    AnalyticsService, ApplicationReconciler, ApplicationService, CheckoutService, IdentityGate,
    ReviewService, ScholarshipCatalogue, UserDirectory,
};

/// Parameter object bundling every port implementation the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub scholarships: Arc<dyn ScholarshipRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub users: Arc<dyn UserRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub payments: Arc<dyn PaymentGateway>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub clock: Arc<dyn Clock>,
    /// Front-end origin used for checkout redirects.
    pub client_url: String,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue: ScholarshipCatalogue,
    pub reconciler: ApplicationReconciler,
    pub applications: ApplicationService,
    pub reviews: ReviewService,
    pub users: UserDirectory,
    pub checkout: CheckoutService,
    pub identity: IdentityGate,
    pub analytics: AnalyticsService,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wire the domain services over a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use scholarlink::inbound::http::state::HttpState;
    /// use scholarlink::test_support::TestHarness;
    ///
    /// let harness = TestHarness::new();
    /// let state = HttpState::new(harness.ports("https://app.example.com"));
    /// let _catalogue = state.catalogue.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            scholarships,
            applications,
            reviews,
            users,
            analytics,
            payments,
            identity,
            clock,
            client_url,
        } = ports;
        Self {
            catalogue: ScholarshipCatalogue::new(scholarships.clone(), clock.clone()),
            reconciler: ApplicationReconciler::new(
                scholarships.clone(),
                applications.clone(),
                clock.clone(),
            ),
            applications: ApplicationService::new(applications),
            reviews: ReviewService::new(reviews, scholarships.clone(), clock.clone()),
            users: UserDirectory::new(users, clock),
            checkout: CheckoutService::new(scholarships, payments, client_url),
            identity: IdentityGate::new(identity),
            analytics: AnalyticsService::new(analytics),
        }
    }
}
