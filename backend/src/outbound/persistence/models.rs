//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions from rows are fallible because
//! the database stores enums and emails as text.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationId, ApplicationKey, ApplicationReview, ApplicationSnapshot, Email,
    FeeAmount, Rating, Review, ReviewEdit, ReviewId, Scholarship, ScholarshipId, ScholarshipPatch,
    User, UserId,
};

use super::schema::{applications, reviews, scholarships, users};

fn fee_from_db(value: Option<f64>, column: &str) -> Result<Option<FeeAmount>, String> {
    value
        .map(|raw| FeeAmount::new(raw).map_err(|err| format!("{column}: {err}")))
        .transpose()
}

fn email_from_db(value: String, column: &str) -> Result<Email, String> {
    Email::new(value).map_err(|err| format!("{column}: {err}"))
}

// ---------------------------------------------------------------------------
// Scholarships
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = scholarships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScholarshipRow {
    pub id: Uuid,
    pub scholarship_name: String,
    pub university_name: String,
    pub university_image: Option<String>,
    pub university_country: String,
    pub university_city: Option<String>,
    pub university_world_rank: Option<i32>,
    pub subject_category: String,
    pub scholarship_category: String,
    pub degree: String,
    pub tuition_fees: Option<f64>,
    pub application_fees: Option<f64>,
    pub service_charge: Option<f64>,
    pub application_deadline: Option<NaiveDate>,
    pub post_date: DateTime<Utc>,
    pub posted_by: Option<String>,
}

impl TryFrom<ScholarshipRow> for Scholarship {
    type Error = String;

    fn try_from(row: ScholarshipRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ScholarshipId::from_uuid(row.id),
            scholarship_name: row.scholarship_name,
            university_name: row.university_name,
            university_image: row.university_image,
            university_country: row.university_country,
            university_city: row.university_city,
            university_world_rank: row.university_world_rank,
            subject_category: row.subject_category,
            scholarship_category: row.scholarship_category,
            degree: row.degree,
            tuition_fees: fee_from_db(row.tuition_fees, "tuition_fees")?,
            application_fees: fee_from_db(row.application_fees, "application_fees")?,
            service_charge: fee_from_db(row.service_charge, "service_charge")?,
            application_deadline: row.application_deadline,
            post_date: row.post_date,
            posted_by: row.posted_by,
        })
    }
}

impl From<&Scholarship> for ScholarshipRow {
    fn from(value: &Scholarship) -> Self {
        Self {
            id: *value.id.as_uuid(),
            scholarship_name: value.scholarship_name.clone(),
            university_name: value.university_name.clone(),
            university_image: value.university_image.clone(),
            university_country: value.university_country.clone(),
            university_city: value.university_city.clone(),
            university_world_rank: value.university_world_rank,
            subject_category: value.subject_category.clone(),
            scholarship_category: value.scholarship_category.clone(),
            degree: value.degree.clone(),
            tuition_fees: value.tuition_fees.map(FeeAmount::value),
            application_fees: value.application_fees.map(FeeAmount::value),
            service_charge: value.service_charge.map(FeeAmount::value),
            application_deadline: value.application_deadline,
            post_date: value.post_date,
            posted_by: value.posted_by.clone(),
        }
    }
}

/// Partial scholarship update; `None` fields are skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = scholarships)]
pub(crate) struct ScholarshipChangeset {
    pub scholarship_name: Option<String>,
    pub university_name: Option<String>,
    pub university_image: Option<String>,
    pub university_country: Option<String>,
    pub university_city: Option<String>,
    pub university_world_rank: Option<i32>,
    pub subject_category: Option<String>,
    pub scholarship_category: Option<String>,
    pub degree: Option<String>,
    pub tuition_fees: Option<f64>,
    pub application_fees: Option<f64>,
    pub service_charge: Option<f64>,
    pub application_deadline: Option<NaiveDate>,
}

impl From<&ScholarshipPatch> for ScholarshipChangeset {
    fn from(patch: &ScholarshipPatch) -> Self {
        Self {
            scholarship_name: patch.scholarship_name.clone(),
            university_name: patch.university_name.clone(),
            university_image: patch.university_image.clone(),
            university_country: patch.university_country.clone(),
            university_city: patch.university_city.clone(),
            university_world_rank: patch.university_world_rank,
            subject_category: patch.subject_category.clone(),
            scholarship_category: patch.scholarship_category.clone(),
            degree: patch.degree.clone(),
            tuition_fees: patch.tuition_fees.map(FeeAmount::value),
            application_fees: patch.application_fees.map(FeeAmount::value),
            service_charge: patch.service_charge.map(FeeAmount::value),
            application_deadline: patch.application_deadline,
        }
    }
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: Uuid,
    pub scholarship_id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub scholarship_name: String,
    pub university_name: String,
    pub scholarship_category: String,
    pub subject_category: String,
    pub degree: String,
    pub application_fees: f64,
    pub service_charge: f64,
    pub payment_status: String,
    pub application_status: String,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
    pub application_date: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = String;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let fee = |value: f64, column: &str| {
            FeeAmount::new(value).map_err(|err| format!("{column}: {err}"))
        };
        Ok(Self {
            id: ApplicationId::from_uuid(row.id),
            key: ApplicationKey {
                scholarship_id: ScholarshipId::from_uuid(row.scholarship_id),
                user_email: email_from_db(row.user_email, "user_email")?,
            },
            user_name: row.user_name,
            snapshot: ApplicationSnapshot {
                scholarship_name: row.scholarship_name,
                university_name: row.university_name,
                scholarship_category: row.scholarship_category,
                subject_category: row.subject_category,
                degree: row.degree,
                application_fees: fee(row.application_fees, "application_fees")?,
                service_charge: fee(row.service_charge, "service_charge")?,
            },
            payment_status: row.payment_status.parse()?,
            application_status: row.application_status.parse()?,
            feedback: row.feedback,
            created_at: row.created_at,
            application_date: row.application_date,
        })
    }
}

impl From<&Application> for ApplicationRow {
    fn from(value: &Application) -> Self {
        Self {
            id: *value.id.as_uuid(),
            scholarship_id: *value.key.scholarship_id.as_uuid(),
            user_email: value.key.user_email.to_string(),
            user_name: value.user_name.clone(),
            scholarship_name: value.snapshot.scholarship_name.clone(),
            university_name: value.snapshot.university_name.clone(),
            scholarship_category: value.snapshot.scholarship_category.clone(),
            subject_category: value.snapshot.subject_category.clone(),
            degree: value.snapshot.degree.clone(),
            application_fees: value.snapshot.application_fees.value(),
            service_charge: value.snapshot.service_charge.value(),
            payment_status: value.payment_status.as_str().to_owned(),
            application_status: value.application_status.as_str().to_owned(),
            feedback: value.feedback.clone(),
            created_at: value.created_at,
            application_date: value.application_date,
        }
    }
}

/// Moderator update; `None` fields are skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = applications)]
pub(crate) struct ApplicationReviewChangeset {
    pub application_status: Option<String>,
    pub feedback: Option<String>,
}

impl From<&ApplicationReview> for ApplicationReviewChangeset {
    fn from(review: &ApplicationReview) -> Self {
        Self {
            application_status: review.application_status.map(|s| s.as_str().to_owned()),
            feedback: review.feedback.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub scholarship_id: Uuid,
    pub scholarship_name: String,
    pub university_name: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub reviewer_image: Option<String>,
    pub rating_point: i16,
    pub review_comment: String,
    pub review_date: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = String;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReviewId::from_uuid(row.id),
            scholarship_id: ScholarshipId::from_uuid(row.scholarship_id),
            scholarship_name: row.scholarship_name,
            university_name: row.university_name,
            reviewer_name: row.reviewer_name,
            reviewer_email: email_from_db(row.reviewer_email, "reviewer_email")?,
            reviewer_image: row.reviewer_image,
            rating_point: Rating::new(i64::from(row.rating_point))
                .map_err(|err| format!("rating_point: {err}"))?,
            review_comment: row.review_comment,
            review_date: row.review_date,
        })
    }
}

impl From<&Review> for ReviewRow {
    fn from(value: &Review) -> Self {
        Self {
            id: *value.id.as_uuid(),
            scholarship_id: *value.scholarship_id.as_uuid(),
            scholarship_name: value.scholarship_name.clone(),
            university_name: value.university_name.clone(),
            reviewer_name: value.reviewer_name.clone(),
            reviewer_email: value.reviewer_email.to_string(),
            reviewer_image: value.reviewer_image.clone(),
            rating_point: i16::from(value.rating_point.value()),
            review_comment: value.review_comment.clone(),
            review_date: value.review_date,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewChangeset {
    pub rating_point: Option<i16>,
    pub review_comment: Option<String>,
    pub review_date: DateTime<Utc>,
}

impl From<&ReviewEdit> for ReviewChangeset {
    fn from(edit: &ReviewEdit) -> Self {
        Self {
            rating_point: edit.rating_point.map(|r| i16::from(r.value())),
            review_comment: edit.review_comment.clone(),
            review_date: edit.edited_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: email_from_db(row.email, "email")?,
            name: row.name,
            photo_url: row.photo_url,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

impl From<&User> for UserRow {
    fn from(value: &User) -> Self {
        Self {
            id: *value.id.as_uuid(),
            email: value.email.to_string(),
            name: value.name.clone(),
            photo_url: value.photo_url.clone(),
            role: value.role.as_str().to_owned(),
            created_at: value.created_at,
        }
    }
}
