//! Domain primitives, services and driven ports.
//!
//! Purpose: define the scholarship, application, review and user entities,
//! the listing query builder and the application reconciler, plus the
//! services HTTP handlers call. Nothing here knows about actix, Diesel or
//! reqwest; adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - listing: filter, sort and page window construction.
//! - ApplicationReconciler: one application per scholarship and applicant.
//! - Services: ScholarshipCatalogue, ApplicationService, ReviewService,
//!   UserDirectory, CheckoutService, IdentityGate, AnalyticsService.

pub mod analytics;
pub mod application;
pub mod application_reconciler;
pub mod application_service;
pub mod checkout;
pub mod error;
pub mod identity;
pub mod listing;
pub mod ports;
pub mod review;
pub mod review_service;
pub mod scholarship;
pub mod scholarship_catalogue;
pub mod trace_id;
pub mod user;
pub mod user_directory;
pub(crate) mod validation;

pub use self::analytics::AnalyticsService;
pub use self::application::{
    Application, ApplicationId, ApplicationKey, ApplicationReview, ApplicationSnapshot,
    ApplicationStatus, ApplicationUpsert, PaymentStatus, ReconcileOutcome, ReconcileRequest,
};
pub use self::application_reconciler::ApplicationReconciler;
pub use self::application_service::{ApplicationReviewInput, ApplicationService};
pub use self::checkout::{CheckoutInput, CheckoutService};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::identity::{BearerToken, IdentityGate};
pub use self::listing::{ListingParams, ScholarshipQuery, UserQuery};
pub use self::review::{NewReview, Rating, Review, ReviewEdit, ReviewId, ReviewScope};
pub use self::review_service::{ReviewEditInput, ReviewInput, ReviewService};
pub use self::scholarship::{
    FeeAmount, FeeValidationError, Scholarship, ScholarshipDraft, ScholarshipId, ScholarshipPatch,
};
pub use self::scholarship_catalogue::{ScholarshipCatalogue, ScholarshipInput};
pub use self::trace_id::TraceId;
pub use self::user::{Email, EmailValidationError, NewUser, Role, User, UserId, UserRegistration};
pub use self::user_directory::{RegistrationInput, UserDirectory};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use scholarlink::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("scholarship not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
