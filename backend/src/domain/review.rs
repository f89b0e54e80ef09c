//! Scholarship reviews left by applicants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Email, Scholarship, ScholarshipId};

/// Stable review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReviewId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Validation errors for [`Rating`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    #[error("rating must be between {min} and {max}")]
    OutOfRange { min: u8, max: u8 },
}

/// A star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a rating.
    ///
    /// # Examples
    /// ```
    /// use scholarlink::domain::Rating;
    ///
    /// assert_eq!(Rating::new(4).map(Rating::value), Ok(4));
    /// assert!(Rating::new(0).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, RatingValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(RatingValidationError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            })
    }

    /// Numeric value.
    pub fn value(self) -> u8 {
        self.0
    }
}

/// A stored review.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub scholarship_id: ScholarshipId,
    pub scholarship_name: String,
    pub university_name: String,
    pub reviewer_name: String,
    pub reviewer_email: Email,
    pub reviewer_image: Option<String>,
    pub rating_point: Rating,
    pub review_comment: String,
    pub review_date: DateTime<Utc>,
}

/// Validated input for a new review; scholarship names are copied from the
/// stored scholarship.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub scholarship_id: ScholarshipId,
    pub reviewer_name: String,
    pub reviewer_email: Email,
    pub reviewer_image: Option<String>,
    pub rating_point: Rating,
    pub review_comment: String,
}

impl NewReview {
    /// Attach the scholarship snapshot and review date.
    pub fn into_review(self, scholarship: &Scholarship, review_date: DateTime<Utc>) -> Review {
        Review {
            id: ReviewId::random(),
            scholarship_id: self.scholarship_id,
            scholarship_name: scholarship.scholarship_name.clone(),
            university_name: scholarship.university_name.clone(),
            reviewer_name: self.reviewer_name,
            reviewer_email: self.reviewer_email,
            reviewer_image: self.reviewer_image,
            rating_point: self.rating_point,
            review_comment: self.review_comment,
            review_date,
        }
    }
}

/// Edit of an existing review. The review date is refreshed on every edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEdit {
    pub rating_point: Option<Rating>,
    pub review_comment: Option<String>,
    pub edited_at: DateTime<Utc>,
}

impl ReviewEdit {
    /// Apply to an in-memory record.
    pub fn apply_to(&self, target: &mut Review) {
        if let Some(rating) = self.rating_point {
            target.rating_point = rating;
        }
        if let Some(comment) = &self.review_comment {
            target.review_comment.clone_from(comment);
        }
        target.review_date = self.edited_at;
    }
}

/// Which reviews to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewScope {
    All,
    Scholarship(ScholarshipId),
    Reviewer(Email),
}

impl ReviewScope {
    /// Evaluate in memory.
    pub fn includes(&self, review: &Review) -> bool {
        match self {
            Self::All => true,
            Self::Scholarship(id) => review.scholarship_id == *id,
            Self::Reviewer(email) => review.reviewer_email == *email,
        }
    }
}
