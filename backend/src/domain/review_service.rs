//! Review creation, listing, editing and deletion.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::application_reconciler::parse_email;
use crate::domain::ports::{ReviewRepository, ReviewRepositoryError, ScholarshipRepository};
use crate::domain::scholarship_catalogue::{
    map_scholarship_error, parse_scholarship_id, scholarship_not_found,
};
use crate::domain::validation::{
    FieldName, invalid_identifier_error, invalid_value_error, missing_field_error, optional_text,
    require_text,
};
use crate::domain::{Error, NewReview, Rating, Review, ReviewEdit, ReviewId, ReviewScope};

const ID: FieldName = FieldName::new("id");
const SCHOLARSHIP_ID: FieldName = FieldName::new("scholarshipId");
const REVIEWER_NAME: FieldName = FieldName::new("reviewerName");
const REVIEWER_EMAIL: FieldName = FieldName::new("reviewerEmail");
const RATING_POINT: FieldName = FieldName::new("ratingPoint");
const REVIEW_COMMENT: FieldName = FieldName::new("reviewComment");
const EMAIL: FieldName = FieldName::new("email");

fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
    }
}

fn parse_rating(raw: i64) -> Result<Rating, Error> {
    Rating::new(raw).map_err(|err| invalid_value_error(RATING_POINT, err))
}

fn parse_review_id(raw: &str) -> Result<ReviewId, Error> {
    raw.parse().map_err(|_| invalid_identifier_error(ID))
}

fn review_not_found(id: &ReviewId) -> Error {
    Error::not_found(format!("review {id} not found"))
}

/// Unvalidated new review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewInput {
    pub scholarship_id: Option<String>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
    pub reviewer_image: Option<String>,
    pub rating_point: Option<i64>,
    pub review_comment: Option<String>,
}

/// Unvalidated review edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewEditInput {
    pub rating_point: Option<i64>,
    pub review_comment: Option<String>,
}

/// Manage scholarship reviews.
#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    scholarships: Arc<dyn ScholarshipRepository>,
    clock: Arc<dyn Clock>,
}

impl ReviewService {
    /// Create the service.
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        scholarships: Arc<dyn ScholarshipRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reviews,
            scholarships,
            clock,
        }
    }

    /// Validate and store a review, copying the scholarship's names.
    pub async fn create(&self, input: ReviewInput) -> Result<Review, Error> {
        let scholarship_id = parse_scholarship_id(
            &require_text(input.scholarship_id, SCHOLARSHIP_ID)?,
            SCHOLARSHIP_ID,
        )?;
        let new_review = NewReview {
            scholarship_id,
            reviewer_name: require_text(input.reviewer_name, REVIEWER_NAME)?,
            reviewer_email: parse_email(
                require_text(input.reviewer_email, REVIEWER_EMAIL)?,
                REVIEWER_EMAIL,
            )?,
            reviewer_image: optional_text(input.reviewer_image),
            rating_point: parse_rating(
                input
                    .rating_point
                    .ok_or_else(|| missing_field_error(RATING_POINT))?,
            )?,
            review_comment: require_text(input.review_comment, REVIEW_COMMENT)?,
        };

        let scholarship = self
            .scholarships
            .find_by_id(&scholarship_id)
            .await
            .map_err(map_scholarship_error)?
            .ok_or_else(|| scholarship_not_found(&scholarship_id))?;
        let review = new_review.into_review(&scholarship, self.clock.utc());
        self.reviews.insert(&review).await.map_err(map_review_error)?;
        info!(review_id = %review.id, scholarship_id = %scholarship_id, "review created");
        Ok(review)
    }

    /// Reviews of one scholarship, or all reviews.
    pub async fn list(&self, scholarship_id: Option<String>) -> Result<Vec<Review>, Error> {
        let scope = match optional_text(scholarship_id) {
            Some(raw) => ReviewScope::Scholarship(parse_scholarship_id(&raw, SCHOLARSHIP_ID)?),
            None => ReviewScope::All,
        };
        self.reviews.list(&scope).await.map_err(map_review_error)
    }

    /// Reviews written by one reviewer; the email is required.
    pub async fn list_by_reviewer(&self, email: Option<String>) -> Result<Vec<Review>, Error> {
        let email = parse_email(require_text(email, EMAIL)?, EMAIL)?;
        self.reviews
            .list(&ReviewScope::Reviewer(email))
            .await
            .map_err(map_review_error)
    }

    /// Edit rating and/or comment.
    pub async fn update(&self, raw_id: &str, input: ReviewEditInput) -> Result<Review, Error> {
        let id = parse_review_id(raw_id)?;
        let edit = ReviewEdit {
            rating_point: input.rating_point.map(parse_rating).transpose()?,
            review_comment: input
                .review_comment
                .map(|comment| require_text(Some(comment), REVIEW_COMMENT))
                .transpose()?,
            edited_at: self.clock.utc(),
        };
        if edit.rating_point.is_none() && edit.review_comment.is_none() {
            return Err(Error::invalid_request(
                "ratingPoint or reviewComment is required",
            ));
        }
        let updated = self
            .reviews
            .update(&id, &edit)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| review_not_found(&id))?;
        info!(review_id = %id, "review updated");
        Ok(updated)
    }

    /// Delete a review.
    pub async fn delete(&self, raw_id: &str) -> Result<(), Error> {
        let id = parse_review_id(raw_id)?;
        if !self.reviews.delete(&id).await.map_err(map_review_error)? {
            return Err(review_not_found(&id));
        }
        info!(review_id = %id, "review deleted");
        Ok(())
    }
}
