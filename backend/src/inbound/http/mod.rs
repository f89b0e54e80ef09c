//! HTTP inbound adapter exposing REST endpoints.

pub mod analytics;
pub mod applications;
pub mod checkout;
pub mod envelope;
pub mod error;
pub mod health;
pub mod reviews;
pub mod root;
pub mod schemas;
pub mod scholarships;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every REST handler on `cfg`.
///
/// Health probes are registered separately by the server since they depend on
/// [`health::HealthState`] rather than [`state::HttpState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root::greeting)
        .service(scholarships::list_scholarships)
        .service(scholarships::top_scholarships)
        .service(scholarships::get_scholarship)
        .service(scholarships::create_scholarship)
        .service(scholarships::update_scholarship)
        .service(scholarships::delete_scholarship)
        .service(scholarships::list_admin_scholarships)
        .service(applications::reconcile_application)
        .service(applications::list_applications)
        .service(applications::get_application)
        .service(applications::review_application)
        .service(applications::withdraw_application)
        .service(reviews::create_review)
        .service(reviews::list_reviews)
        .service(reviews::list_my_reviews)
        .service(reviews::update_review)
        .service(reviews::delete_review)
        .service(users::register_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(checkout::create_checkout_session)
        .service(analytics::get_analytics);
}
