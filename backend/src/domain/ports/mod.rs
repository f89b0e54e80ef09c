//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod analytics_repository;
mod application_repository;
mod identity_verifier;
mod payment_gateway;
mod review_repository;
mod scholarship_repository;
mod user_repository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
pub use analytics_repository::{
    AnalyticsRepository, AnalyticsRepositoryError, AnalyticsSnapshot, LabelCount,
};
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{
    ApplicationRepository, ApplicationRepositoryError, ApplicationScope, PendingRemoval,
};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{IdentityVerifier, IdentityVerifierError, VerifiedIdentity};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    CheckoutSession, CheckoutSessionRequest, PaymentGateway, PaymentGatewayError,
};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use scholarship_repository::MockScholarshipRepository;
pub use scholarship_repository::{ScholarshipRepository, ScholarshipRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
