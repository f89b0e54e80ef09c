//! Review handlers.
//!
//! ```text
//! POST   /reviews
//! GET    /reviews?scholarshipId=
//! GET    /my-reviews?email=
//! PATCH  /reviews/{id}   {"ratingPoint":4,"reviewComment":"…"}
//! DELETE /reviews/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Review, ReviewEditInput, ReviewInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, MessageEnvelope};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// New review body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub scholarship_id: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub reviewer_name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub reviewer_email: Option<String>,
    pub reviewer_image: Option<String>,
    /// Whole number from 1 to 5.
    #[schema(example = 5)]
    pub rating_point: Option<i64>,
    pub review_comment: Option<String>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(body: ReviewRequest) -> Self {
        Self {
            scholarship_id: body.scholarship_id,
            reviewer_name: body.reviewer_name,
            reviewer_email: body.reviewer_email,
            reviewer_image: body.reviewer_image,
            rating_point: body.rating_point,
            review_comment: body.review_comment,
        }
    }
}

/// Review edit body; at least one field is required.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEditRequest {
    #[schema(example = 4)]
    pub rating_point: Option<i64>,
    pub review_comment: Option<String>,
}

/// `?scholarshipId=` filter.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScholarshipReviewsQuery {
    /// Reviews of this scholarship only; all reviews when absent.
    pub scholarship_id: Option<String>,
}

/// `?email=` filter.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewerQuery {
    /// Reviewer email.
    pub email: Option<String>,
}

/// Review as served to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    pub id: String,
    pub scholarship_id: String,
    pub scholarship_name: String,
    pub university_name: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub reviewer_image: Option<String>,
    pub rating_point: u8,
    pub review_comment: String,
    #[schema(value_type = String)]
    pub review_date: DateTime<Utc>,
}

impl From<Review> for ReviewBody {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            scholarship_id: review.scholarship_id.to_string(),
            scholarship_name: review.scholarship_name,
            university_name: review.university_name,
            reviewer_name: review.reviewer_name,
            reviewer_email: review.reviewer_email.into(),
            reviewer_image: review.reviewer_image,
            rating_point: review.rating_point.value(),
            review_comment: review.review_comment,
            review_date: review.review_date,
        }
    }
}

fn bodies(reviews: Vec<Review>) -> Vec<ReviewBody> {
    reviews.into_iter().map(ReviewBody::from).collect()
}

/// Post a review of a scholarship.
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Created", body = ReviewBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown scholarship", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let review = state.reviews.create(payload.into_inner().into()).await?;
    Ok(envelope::created(ReviewBody::from(review)))
}

/// List reviews, newest first.
#[utoipa::path(
    get,
    path = "/reviews",
    params(ScholarshipReviewsQuery),
    responses(
        (status = 200, description = "Reviews", body = [ReviewBody]),
        (status = 400, description = "Malformed scholarship identifier", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews"
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    query: web::Query<ScholarshipReviewsQuery>,
) -> ApiResult<HttpResponse> {
    let reviews = state
        .reviews
        .list(query.into_inner().scholarship_id)
        .await?;
    Ok(envelope::ok(bodies(reviews)))
}

/// List one reviewer's reviews.
#[utoipa::path(
    get,
    path = "/my-reviews",
    params(ReviewerQuery),
    responses(
        (status = 200, description = "Reviews", body = [ReviewBody]),
        (status = 400, description = "Missing or malformed email", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listMyReviews"
)]
#[get("/my-reviews")]
pub async fn list_my_reviews(
    state: web::Data<HttpState>,
    query: web::Query<ReviewerQuery>,
) -> ApiResult<HttpResponse> {
    let reviews = state
        .reviews
        .list_by_reviewer(query.into_inner().email)
        .await?;
    Ok(envelope::ok(bodies(reviews)))
}

/// Edit rating and/or comment.
#[utoipa::path(
    patch,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = ReviewEditRequest,
    responses(
        (status = 200, description = "Updated", body = ReviewBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[patch("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ReviewEditRequest>,
) -> ApiResult<HttpResponse> {
    let ReviewEditRequest {
        rating_point,
        review_comment,
    } = payload.into_inner();
    let review = state
        .reviews
        .update(
            &path,
            ReviewEditInput {
                rating_point,
                review_comment,
            },
        )
        .await?;
    Ok(envelope::ok(ReviewBody::from(review)))
}

/// Delete a review.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageEnvelope),
        (status = 404, description = "Unknown review", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.reviews.delete(&path).await?;
    Ok(envelope::message("review deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scholarship;
    use crate::inbound::http::test_utils::{json_body, test_app};
    use crate::test_support::{TestHarness, draft};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn harness() -> TestHarness {
        TestHarness::new()
    }

    fn review_json(scholarship: &Scholarship, email: &str, rating: i64) -> Value {
        json!({
            "scholarshipId": scholarship.id.to_string(),
            "reviewerName": "Ada",
            "reviewerEmail": email,
            "ratingPoint": rating,
            "reviewComment": "Smooth process"
        })
    }

    #[rstest]
    #[actix_web::test]
    async fn create_copies_scholarship_names(harness: TestHarness) {
        let scholarship =
            harness.seed_scholarship(draft("Oxford Merit Award", "University of Oxford"));
        let app = actix_test::init_service(test_app(harness.state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/reviews")
            .set_json(review_json(&scholarship, "ada@example.com", 5))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let value = json_body(response).await;
        assert_eq!(value["data"]["scholarshipName"], "Oxford Merit Award");
        assert_eq!(value["data"]["universityName"], "University of Oxford");
        assert_eq!(value["data"]["ratingPoint"], 5);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::six(6)]
    #[actix_web::test]
    async fn out_of_range_rating_is_invalid(harness: TestHarness, #[case] rating: i64) {
        let scholarship = harness.seed_scholarship(draft("Award", "Uni"));
        let app = actix_test::init_service(test_app(harness.state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/reviews")
            .set_json(review_json(&scholarship, "ada@example.com", rating))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(harness.store.reviews().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn listings_scope_by_scholarship_and_reviewer(harness: TestHarness) {
        let first = harness.seed_scholarship(draft("First", "Uni"));
        let second = harness.seed_scholarship(draft("Second", "Uni"));
        let app = actix_test::init_service(test_app(harness.state())).await;
        for (scholarship, email) in [
            (&first, "ada@example.com"),
            (&second, "ada@example.com"),
            (&first, "grace@example.com"),
        ] {
            let request = actix_test::TestRequest::post()
                .uri("/reviews")
                .set_json(review_json(scholarship, email, 4))
                .to_request();
            actix_test::call_service(&app, request).await;
        }

        let by_scholarship = actix_test::TestRequest::get()
            .uri(&format!("/reviews?scholarshipId={}", first.id))
            .to_request();
        let by_scholarship = json_body(actix_test::call_service(&app, by_scholarship).await).await;
        assert_eq!(by_scholarship["data"].as_array().map(Vec::len), Some(2));

        let mine = actix_test::TestRequest::get()
            .uri("/my-reviews?email=ada@example.com")
            .to_request();
        let mine = json_body(actix_test::call_service(&app, mine).await).await;
        assert_eq!(mine["data"].as_array().map(Vec::len), Some(2));

        let all = actix_test::TestRequest::get().uri("/reviews").to_request();
        let all = json_body(actix_test::call_service(&app, all).await).await;
        assert_eq!(all["data"].as_array().map(Vec::len), Some(3));
    }

    #[rstest]
    #[actix_web::test]
    async fn my_reviews_requires_email(harness: TestHarness) {
        let app = actix_test::init_service(test_app(harness.state())).await;
        let request = actix_test::TestRequest::get().uri("/my-reviews").to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn edit_then_delete(harness: TestHarness) {
        let scholarship = harness.seed_scholarship(draft("Award", "Uni"));
        let app = actix_test::init_service(test_app(harness.state())).await;
        let create = actix_test::TestRequest::post()
            .uri("/reviews")
            .set_json(review_json(&scholarship, "ada@example.com", 3))
            .to_request();
        let created = json_body(actix_test::call_service(&app, create).await).await;
        let uri = format!("/reviews/{}", created["data"]["id"].as_str().expect("id"));

        let edit = actix_test::TestRequest::patch()
            .uri(&uri)
            .set_json(json!({ "ratingPoint": 4 }))
            .to_request();
        let edited = json_body(actix_test::call_service(&app, edit).await).await;
        assert_eq!(edited["data"]["ratingPoint"], 4);
        assert_eq!(edited["data"]["reviewComment"], "Smooth process");

        let delete = actix_test::TestRequest::delete().uri(&uri).to_request();
        assert_eq!(
            actix_test::call_service(&app, delete).await.status(),
            StatusCode::OK
        );
        let again = actix_test::TestRequest::delete().uri(&uri).to_request();
        assert_eq!(
            actix_test::call_service(&app, again).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
