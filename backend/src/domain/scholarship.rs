//! Scholarship listings.
//!
//! Fee amounts arrive from admin forms as numbers or numeric strings; they are
//! normalised to [`FeeAmount`] on write so readers (listing sort, application
//! fee snapshots, checkout) only ever see canonical numeric values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable scholarship identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScholarshipId(Uuid);

impl ScholarshipId {
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

impl fmt::Display for ScholarshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScholarshipId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Validation errors for [`FeeAmount`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeeValidationError {
    /// Text that does not parse as a number.
    #[error("fee must be a number")]
    NotNumeric,
    /// NaN or infinite.
    #[error("fee must be finite")]
    NotFinite,
    /// Below zero.
    #[error("fee must not be negative")]
    Negative,
}

/// A non-negative, finite monetary amount in the listing currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FeeAmount(f64);

impl FeeAmount {
    /// The zero amount used when a scholarship omits a fee.
    pub const ZERO: Self = Self(0.0);

    /// Validate a numeric amount.
    pub fn new(value: f64) -> Result<Self, FeeValidationError> {
        if !value.is_finite() {
            return Err(FeeValidationError::NotFinite);
        }
        if value < 0.0 {
            return Err(FeeValidationError::Negative);
        }
        Ok(Self(value))
    }

    /// Parse a numeric string such as `"25"` or `" 12.50 "`.
    ///
    /// # Examples
    /// ```
    /// use scholarlink::domain::FeeAmount;
    ///
    /// assert_eq!(FeeAmount::parse(" 12.5 ").map(FeeAmount::value), Ok(12.5));
    /// assert!(FeeAmount::parse("free").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, FeeValidationError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| FeeValidationError::NotNumeric)
            .and_then(Self::new)
    }

    /// Numeric value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Resolve an optional stored fee, defaulting to zero.
    pub fn or_zero(fee: Option<Self>) -> Self {
        fee.unwrap_or(Self::ZERO)
    }
}

impl<'de> Deserialize<'de> for FeeAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawFee {
            Number(f64),
            Text(String),
        }

        let parsed = match RawFee::deserialize(deserializer)? {
            RawFee::Number(value) => Self::new(value),
            RawFee::Text(text) => Self::parse(&text),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// A published scholarship.
#[derive(Debug, Clone, PartialEq)]
pub struct Scholarship {
    pub id: ScholarshipId,
    pub scholarship_name: String,
    pub university_name: String,
    pub university_image: Option<String>,
    pub university_country: String,
    pub university_city: Option<String>,
    pub university_world_rank: Option<i32>,
    pub subject_category: String,
    pub scholarship_category: String,
    pub degree: String,
    pub tuition_fees: Option<FeeAmount>,
    pub application_fees: Option<FeeAmount>,
    pub service_charge: Option<FeeAmount>,
    pub application_deadline: Option<NaiveDate>,
    pub post_date: DateTime<Utc>,
    pub posted_by: Option<String>,
}

impl Scholarship {
    /// Application fee used for checkout and application snapshots.
    pub fn application_fee_or_zero(&self) -> FeeAmount {
        FeeAmount::or_zero(self.application_fees)
    }

    /// Service charge used for checkout and application snapshots.
    pub fn service_charge_or_zero(&self) -> FeeAmount {
        FeeAmount::or_zero(self.service_charge)
    }
}

/// Validated input for creating a scholarship.
#[derive(Debug, Clone, PartialEq)]
pub struct ScholarshipDraft {
    pub scholarship_name: String,
    pub university_name: String,
    pub university_image: Option<String>,
    pub university_country: String,
    pub university_city: Option<String>,
    pub university_world_rank: Option<i32>,
    pub subject_category: String,
    pub scholarship_category: String,
    pub degree: String,
    pub tuition_fees: Option<FeeAmount>,
    pub application_fees: Option<FeeAmount>,
    pub service_charge: Option<FeeAmount>,
    pub application_deadline: Option<NaiveDate>,
    pub posted_by: Option<String>,
}

impl ScholarshipDraft {
    /// Assign an identifier and post date.
    pub fn publish(self, post_date: DateTime<Utc>) -> Scholarship {
        Scholarship {
            id: ScholarshipId::random(),
            scholarship_name: self.scholarship_name,
            university_name: self.university_name,
            university_image: self.university_image,
            university_country: self.university_country,
            university_city: self.university_city,
            university_world_rank: self.university_world_rank,
            subject_category: self.subject_category,
            scholarship_category: self.scholarship_category,
            degree: self.degree,
            tuition_fees: self.tuition_fees,
            application_fees: self.application_fees,
            service_charge: self.service_charge,
            application_deadline: self.application_deadline,
            post_date,
            posted_by: self.posted_by,
        }
    }
}

/// Partial admin update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScholarshipPatch {
    pub scholarship_name: Option<String>,
    pub university_name: Option<String>,
    pub university_image: Option<String>,
    pub university_country: Option<String>,
    pub university_city: Option<String>,
    pub university_world_rank: Option<i32>,
    pub subject_category: Option<String>,
    pub scholarship_category: Option<String>,
    pub degree: Option<String>,
    pub tuition_fees: Option<FeeAmount>,
    pub application_fees: Option<FeeAmount>,
    pub service_charge: Option<FeeAmount>,
    pub application_deadline: Option<NaiveDate>,
}

impl ScholarshipPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to an in-memory record.
    pub fn apply_to(&self, target: &mut Scholarship) {
        fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        fn set_optional<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }

        set(&mut target.scholarship_name, self.scholarship_name.as_ref());
        set(&mut target.university_name, self.university_name.as_ref());
        set_optional(&mut target.university_image, self.university_image.as_ref());
        set(&mut target.university_country, self.university_country.as_ref());
        set_optional(&mut target.university_city, self.university_city.as_ref());
        set_optional(&mut target.university_world_rank, self.university_world_rank.as_ref());
        set(&mut target.subject_category, self.subject_category.as_ref());
        set(&mut target.scholarship_category, self.scholarship_category.as_ref());
        set(&mut target.degree, self.degree.as_ref());
        set_optional(&mut target.tuition_fees, self.tuition_fees.as_ref());
        set_optional(&mut target.application_fees, self.application_fees.as_ref());
        set_optional(&mut target.service_charge, self.service_charge.as_ref());
        set_optional(&mut target.application_deadline, self.application_deadline.as_ref());
    }
}
