//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request and response bodies plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that keep utoipa out of the domain
//! - **Security**: the bearer credential accepted by the admin dashboard
//!
//! The generated document is served by Swagger UI in debug builds.

use crate::inbound::http::analytics::{AnalyticsBody, LabelCountBody};
use crate::inbound::http::applications::{ApplicationBody, ApplicationReviewBody, ReconcileBody};
use crate::inbound::http::checkout::{CheckoutRequest, CheckoutSessionBody};
use crate::inbound::http::envelope::{MessageEnvelope, PageMetaBody};
use crate::inbound::http::reviews::{ReviewBody, ReviewEditRequest, ReviewRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::scholarships::{ScholarshipBody, ScholarshipPage, ScholarshipRequest};
use crate::inbound::http::users::{RegistrationRequest, UserBody, UserPage};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer credential scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Identity provider ID token."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ScholarLink backend API",
        description = "Scholarship listings, applications, reviews and checkout."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::root::greeting,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::scholarships::list_scholarships,
        crate::inbound::http::scholarships::top_scholarships,
        crate::inbound::http::scholarships::get_scholarship,
        crate::inbound::http::scholarships::create_scholarship,
        crate::inbound::http::scholarships::update_scholarship,
        crate::inbound::http::scholarships::delete_scholarship,
        crate::inbound::http::scholarships::list_admin_scholarships,
        crate::inbound::http::applications::reconcile_application,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::get_application,
        crate::inbound::http::applications::review_application,
        crate::inbound::http::applications::withdraw_application,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::list_my_reviews,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::checkout::create_checkout_session,
        crate::inbound::http::analytics::get_analytics,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageEnvelope,
        PageMetaBody,
        ScholarshipRequest,
        ScholarshipBody,
        ScholarshipPage,
        ReconcileBody,
        ApplicationReviewBody,
        ApplicationBody,
        ReviewRequest,
        ReviewEditRequest,
        ReviewBody,
        RegistrationRequest,
        UserBody,
        UserPage,
        CheckoutRequest,
        CheckoutSessionBody,
        AnalyticsBody,
        LabelCountBody,
    )),
    tags(
        (name = "scholarships", description = "Scholarship catalogue"),
        (name = "applications", description = "Scholarship applications"),
        (name = "reviews", description = "Scholarship reviews"),
        (name = "users", description = "User accounts"),
        (name = "checkout", description = "Application fee payment"),
        (name = "admin", description = "Administrative views"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
