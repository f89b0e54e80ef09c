//! Application handlers.
//!
//! ```text
//! POST   /applications        {"scholarshipId":"…","userEmail":"…","paymentStatus":"paid"}
//! GET    /applications?email=
//! GET    /applications/{id}
//! PATCH  /applications/{id}   {"applicationStatus":"approved","feedback":"…"}
//! DELETE /applications/{id}
//! ```
//!
//! `POST` answers `201 Created` when the pair was new and `200 OK` when an
//! existing application was refreshed.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Application, ApplicationReviewInput, ApplicationStatus, PaymentStatus, ReconcileOutcome,
    ReconcileRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, MessageEnvelope};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Reconciliation body, typically posted after checkout completes.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub scholarship_id: Option<String>,
    #[schema(example = "ada@example.com")]
    pub user_email: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub user_name: Option<String>,
    #[schema(example = "paid")]
    pub payment_status: Option<String>,
}

impl From<ReconcileBody> for ReconcileRequest {
    fn from(body: ReconcileBody) -> Self {
        Self {
            scholarship_id: body.scholarship_id,
            user_email: body.user_email,
            user_name: body.user_name,
            payment_status: body.payment_status,
        }
    }
}

/// Moderator update body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReviewBody {
    #[schema(example = "approved")]
    pub application_status: Option<String>,
    pub feedback: Option<String>,
}

/// `?email=` filter.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplicantQuery {
    /// Applicant email; all applications when absent.
    pub email: Option<String>,
}

/// Application as served to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBody {
    pub id: String,
    pub scholarship_id: String,
    pub user_email: String,
    pub user_name: String,
    pub scholarship_name: String,
    pub university_name: String,
    pub scholarship_category: String,
    pub subject_category: String,
    pub degree: String,
    pub application_fees: f64,
    pub service_charge: f64,
    #[schema(value_type = String, example = "paid")]
    pub payment_status: PaymentStatus,
    #[schema(value_type = String, example = "pending")]
    pub application_status: ApplicationStatus,
    pub feedback: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub application_date: DateTime<Utc>,
}

impl From<Application> for ApplicationBody {
    fn from(application: Application) -> Self {
        let Application {
            id,
            key,
            user_name,
            snapshot,
            payment_status,
            application_status,
            feedback,
            created_at,
            application_date,
        } = application;
        Self {
            id: id.to_string(),
            scholarship_id: key.scholarship_id.to_string(),
            user_email: key.user_email.into(),
            user_name,
            scholarship_name: snapshot.scholarship_name,
            university_name: snapshot.university_name,
            scholarship_category: snapshot.scholarship_category,
            subject_category: snapshot.subject_category,
            degree: snapshot.degree,
            application_fees: snapshot.application_fees.value(),
            service_charge: snapshot.service_charge.value(),
            payment_status,
            application_status,
            feedback,
            created_at,
            application_date,
        }
    }
}

/// Create or refresh the application for a scholarship and applicant.
#[utoipa::path(
    post,
    path = "/applications",
    request_body = ReconcileBody,
    responses(
        (status = 201, description = "Application created", body = ApplicationBody),
        (status = 200, description = "Existing application updated", body = ApplicationBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown scholarship", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "reconcileApplication"
)]
#[post("/applications")]
pub async fn reconcile_application(
    state: web::Data<HttpState>,
    payload: web::Json<ReconcileBody>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .reconciler
        .reconcile(payload.into_inner().into())
        .await?;
    Ok(match outcome {
        ReconcileOutcome::Created(application) => {
            envelope::created(ApplicationBody::from(application))
        }
        ReconcileOutcome::Updated(application) => envelope::ok(ApplicationBody::from(application)),
    })
}

/// List applications, newest first.
#[utoipa::path(
    get,
    path = "/applications",
    params(ApplicantQuery),
    responses(
        (status = 200, description = "Applications", body = [ApplicationBody]),
        (status = 400, description = "Malformed email", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/applications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    query: web::Query<ApplicantQuery>,
) -> ApiResult<HttpResponse> {
    let applications = state.applications.list(query.into_inner().email).await?;
    Ok(envelope::ok(
        applications
            .into_iter()
            .map(ApplicationBody::from)
            .collect::<Vec<_>>(),
    ))
}

/// Fetch one application.
#[utoipa::path(
    get,
    path = "/applications/{id}",
    params(("id" = String, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Application", body = ApplicationBody),
        (status = 404, description = "Unknown application", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "getApplication"
)]
#[get("/applications/{id}")]
pub async fn get_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let application = state.applications.get(&path).await?;
    Ok(envelope::ok(ApplicationBody::from(application)))
}

/// Set processing status and/or feedback.
#[utoipa::path(
    patch,
    path = "/applications/{id}",
    params(("id" = String, Path, description = "Application identifier")),
    request_body = ApplicationReviewBody,
    responses(
        (status = 200, description = "Updated", body = ApplicationBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown application", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "reviewApplication"
)]
#[patch("/applications/{id}")]
pub async fn review_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ApplicationReviewBody>,
) -> ApiResult<HttpResponse> {
    let ApplicationReviewBody {
        application_status,
        feedback,
    } = payload.into_inner();
    let updated = state
        .applications
        .review(
            &path,
            ApplicationReviewInput {
                application_status,
                feedback,
            },
        )
        .await?;
    Ok(envelope::ok(ApplicationBody::from(updated)))
}

/// Withdraw a pending application.
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    params(("id" = String, Path, description = "Application identifier")),
    responses(
        (status = 200, description = "Withdrawn", body = MessageEnvelope),
        (status = 403, description = "Application is no longer pending", body = ErrorSchema),
        (status = 404, description = "Unknown application", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "withdrawApplication"
)]
#[delete("/applications/{id}")]
pub async fn withdraw_application(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.applications.withdraw(&path).await?;
    Ok(envelope::message("application withdrawn"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeeAmount, Scholarship, ScholarshipDraft};
    use crate::inbound::http::test_utils::{json_body, test_app};
    use crate::test_support::{TestHarness, draft};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn harness() -> TestHarness {
        TestHarness::new()
    }

    fn seed(harness: &TestHarness) -> Scholarship {
        harness.seed_scholarship(ScholarshipDraft {
            application_fees: Some(FeeAmount::new(50.0).expect("fee")),
            service_charge: Some(FeeAmount::new(10.0).expect("fee")),
            ..draft("Oxford Merit Award", "University of Oxford")
        })
    }

    fn reconcile_request(scholarship: &Scholarship, payment: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/applications")
            .set_json(json!({
                "scholarshipId": scholarship.id.to_string(),
                "userEmail": "ada@example.com",
                "userName": "Ada",
                "paymentStatus": payment
            }))
    }

    #[rstest]
    #[actix_web::test]
    async fn reconcile_creates_then_updates(harness: TestHarness) {
        let scholarship = seed(&harness);
        let app = actix_test::init_service(test_app(harness.state())).await;

        let first = reconcile_request(&scholarship, "unpaid").to_request();
        let first = actix_test::call_service(&app, first).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let first = json_body(first).await;
        assert_eq!(first["data"]["applicationStatus"], "pending");
        assert_eq!(first["data"]["applicationFees"], 50.0);

        harness.clock.advance_seconds(60);
        let second = reconcile_request(&scholarship, "paid").to_request();
        let second = actix_test::call_service(&app, second).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second = json_body(second).await;
        assert_eq!(second["data"]["id"], first["data"]["id"]);
        assert_eq!(second["data"]["paymentStatus"], "paid");
        assert_eq!(second["data"]["createdAt"], first["data"]["createdAt"]);
        assert_ne!(
            second["data"]["applicationDate"],
            first["data"]["applicationDate"]
        );
        assert_eq!(harness.store.applications().len(), 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn reconcile_unknown_scholarship_is_not_found(harness: TestHarness) {
        let app = actix_test::init_service(test_app(harness.state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/applications")
            .set_json(json!({
                "scholarshipId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "userEmail": "ada@example.com",
                "paymentStatus": "paid"
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(harness.store.applications().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn reconcile_requires_payment_status(harness: TestHarness) {
        let scholarship = seed(&harness);
        let app = actix_test::init_service(test_app(harness.state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/applications")
            .set_json(json!({
                "scholarshipId": scholarship.id.to_string(),
                "userEmail": "ada@example.com"
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn approved_application_cannot_be_withdrawn(harness: TestHarness) {
        let scholarship = seed(&harness);
        let app = actix_test::init_service(test_app(harness.state())).await;
        let created = reconcile_request(&scholarship, "paid").to_request();
        let created = json_body(actix_test::call_service(&app, created).await).await;
        let uri = format!(
            "/applications/{}",
            created["data"]["id"].as_str().expect("id")
        );

        let approve = actix_test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "applicationStatus": "approved", "feedback": "Welcome" }))
            .to_request();
        let approved = json_body(actix_test::call_service(&app, approve).await).await;
        assert_eq!(approved["data"]["applicationStatus"], "approved");
        assert_eq!(approved["data"]["feedback"], "Welcome");

        let delete = actix_test::TestRequest::delete().uri(&uri).to_request();
        let response = actix_test::call_service(&app, delete).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(harness.store.applications().len(), 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_review_is_invalid(harness: TestHarness) {
        let scholarship = seed(&harness);
        let app = actix_test::init_service(test_app(harness.state())).await;
        let created = reconcile_request(&scholarship, "paid").to_request();
        let created = json_body(actix_test::call_service(&app, created).await).await;
        let request = actix_test::TestRequest::patch()
            .uri(&format!(
                "/applications/{}",
                created["data"]["id"].as_str().expect("id")
            ))
            .set_json(json!({}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_filters_by_email(harness: TestHarness) {
        let scholarship = seed(&harness);
        let app = actix_test::init_service(test_app(harness.state())).await;
        let created = reconcile_request(&scholarship, "paid").to_request();
        actix_test::call_service(&app, created).await;

        let mine = actix_test::TestRequest::get()
            .uri("/applications?email=ada@example.com")
            .to_request();
        let mine = json_body(actix_test::call_service(&app, mine).await).await;
        assert_eq!(mine["data"].as_array().map(Vec::len), Some(1));

        let theirs = actix_test::TestRequest::get()
            .uri("/applications?email=grace@example.com")
            .to_request();
        let theirs = json_body(actix_test::call_service(&app, theirs).await).await;
        assert_eq!(theirs["data"].as_array().map(Vec::len), Some(0));
    }
}
