//! Scholarship catalogue service: public and admin listings plus admin CRUD.

use std::sync::Arc;

use mockable::Clock;
use pagination::Paginated;
use tracing::info;

use crate::domain::listing::{ListingParams, ScholarshipQuery};
use crate::domain::ports::{ScholarshipRepository, ScholarshipRepositoryError};
use crate::domain::validation::{
    FieldName, invalid_identifier_error, optional_text, require_text,
};
use crate::domain::{
    Error, FeeAmount, Scholarship, ScholarshipDraft, ScholarshipId, ScholarshipPatch,
};

const SCHOLARSHIP_NAME: FieldName = FieldName::new("scholarshipName");
const UNIVERSITY_NAME: FieldName = FieldName::new("universityName");
const UNIVERSITY_COUNTRY: FieldName = FieldName::new("universityCountry");
const SUBJECT_CATEGORY: FieldName = FieldName::new("subjectCategory");
const SCHOLARSHIP_CATEGORY: FieldName = FieldName::new("scholarshipCategory");
const DEGREE: FieldName = FieldName::new("degree");
const ID: FieldName = FieldName::new("id");

pub(crate) fn map_scholarship_error(error: ScholarshipRepositoryError) -> Error {
    match error {
        ScholarshipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("scholarship repository unavailable: {message}"))
        }
        ScholarshipRepositoryError::Query { message } => {
            Error::internal(format!("scholarship repository error: {message}"))
        }
    }
}

/// Parse a path or body identifier.
pub(crate) fn parse_scholarship_id(raw: &str, field: FieldName) -> Result<ScholarshipId, Error> {
    raw.parse().map_err(|_| invalid_identifier_error(field))
}

pub(crate) fn scholarship_not_found(id: &ScholarshipId) -> Error {
    Error::not_found(format!("scholarship {id} not found"))
}

/// Unvalidated scholarship fields as submitted by an admin form.
///
/// Fee fields are already normalised to [`FeeAmount`] by deserialisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScholarshipInput {
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
    pub application_deadline: Option<chrono::NaiveDate>,
    pub posted_by: Option<String>,
}

impl ScholarshipInput {
    /// Validate a full record for creation.
    pub fn into_draft(self) -> Result<ScholarshipDraft, Error> {
        Ok(ScholarshipDraft {
            scholarship_name: require_text(self.scholarship_name, SCHOLARSHIP_NAME)?,
            university_name: require_text(self.university_name, UNIVERSITY_NAME)?,
            university_image: optional_text(self.university_image),
            university_country: require_text(self.university_country, UNIVERSITY_COUNTRY)?,
            university_city: optional_text(self.university_city),
            university_world_rank: self.university_world_rank,
            subject_category: require_text(self.subject_category, SUBJECT_CATEGORY)?,
            scholarship_category: require_text(self.scholarship_category, SCHOLARSHIP_CATEGORY)?,
            degree: require_text(self.degree, DEGREE)?,
            tuition_fees: self.tuition_fees,
            application_fees: self.application_fees,
            service_charge: self.service_charge,
            application_deadline: self.application_deadline,
            posted_by: optional_text(self.posted_by),
        })
    }

    /// Validate a partial update. Present text fields must not be blank.
    pub fn into_patch(self) -> Result<ScholarshipPatch, Error> {
        fn present(value: Option<String>, field: FieldName) -> Result<Option<String>, Error> {
            value.map(|raw| require_text(Some(raw), field)).transpose()
        }

        let patch = ScholarshipPatch {
            scholarship_name: present(self.scholarship_name, SCHOLARSHIP_NAME)?,
            university_name: present(self.university_name, UNIVERSITY_NAME)?,
            university_image: optional_text(self.university_image),
            university_country: present(self.university_country, UNIVERSITY_COUNTRY)?,
            university_city: optional_text(self.university_city),
            university_world_rank: self.university_world_rank,
            subject_category: present(self.subject_category, SUBJECT_CATEGORY)?,
            scholarship_category: present(self.scholarship_category, SCHOLARSHIP_CATEGORY)?,
            degree: present(self.degree, DEGREE)?,
            tuition_fees: self.tuition_fees,
            application_fees: self.application_fees,
            service_charge: self.service_charge,
            application_deadline: self.application_deadline,
        };
        if patch.is_empty() {
            return Err(Error::invalid_request("no scholarship fields to update"));
        }
        Ok(patch)
    }
}

/// Scholarship listing and administration.
#[derive(Clone)]
pub struct ScholarshipCatalogue {
    scholarships: Arc<dyn ScholarshipRepository>,
    clock: Arc<dyn Clock>,
}

impl ScholarshipCatalogue {
    /// Create the service over a repository and clock.
    pub fn new(scholarships: Arc<dyn ScholarshipRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            scholarships,
            clock,
        }
    }

    /// Public listing with search, category, country, sort and paging.
    pub async fn browse(&self, params: &ListingParams) -> Result<Paginated<Scholarship>, Error> {
        self.list(&ScholarshipQuery::public(params)).await
    }

    /// Admin listing.
    pub async fn browse_admin(
        &self,
        params: &ListingParams,
    ) -> Result<Paginated<Scholarship>, Error> {
        self.list(&ScholarshipQuery::admin(params)).await
    }

    /// The six scholarships with the lowest tuition fee.
    pub async fn top(&self) -> Result<Vec<Scholarship>, Error> {
        Ok(self.list(&ScholarshipQuery::top()).await?.items)
    }

    async fn list(&self, query: &ScholarshipQuery) -> Result<Paginated<Scholarship>, Error> {
        self.scholarships
            .list(query)
            .await
            .map_err(map_scholarship_error)
    }

    /// Fetch one scholarship by its identifier string.
    pub async fn get(&self, raw_id: &str) -> Result<Scholarship, Error> {
        let id = parse_scholarship_id(raw_id, ID)?;
        self.scholarships
            .find_by_id(&id)
            .await
            .map_err(map_scholarship_error)?
            .ok_or_else(|| scholarship_not_found(&id))
    }

    /// Validate and publish a new scholarship.
    pub async fn create(&self, input: ScholarshipInput) -> Result<Scholarship, Error> {
        let scholarship = input.into_draft()?.publish(self.clock.utc());
        self.scholarships
            .insert(&scholarship)
            .await
            .map_err(map_scholarship_error)?;
        info!(scholarship_id = %scholarship.id, "scholarship created");
        Ok(scholarship)
    }

    /// Apply a partial update.
    pub async fn update(
        &self,
        raw_id: &str,
        input: ScholarshipInput,
    ) -> Result<Scholarship, Error> {
        let id = parse_scholarship_id(raw_id, ID)?;
        let patch = input.into_patch()?;
        let updated = self
            .scholarships
            .update(&id, &patch)
            .await
            .map_err(map_scholarship_error)?
            .ok_or_else(|| scholarship_not_found(&id))?;
        info!(scholarship_id = %id, "scholarship updated");
        Ok(updated)
    }

    /// Delete a scholarship.
    pub async fn delete(&self, raw_id: &str) -> Result<(), Error> {
        let id = parse_scholarship_id(raw_id, ID)?;
        let removed = self
            .scholarships
            .delete(&id)
            .await
            .map_err(map_scholarship_error)?;
        if !removed {
            return Err(scholarship_not_found(&id));
        }
        info!(scholarship_id = %id, "scholarship deleted");
        Ok(())
    }
}
