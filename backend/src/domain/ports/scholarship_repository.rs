//! Port for scholarship persistence.
//!
//! Listing queries arrive fully built (see [`crate::domain::listing`]);
//! adapters only translate them into their store's filter, order and window.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Scholarship, ScholarshipId, ScholarshipPatch, ScholarshipQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by scholarship repository adapters.
    pub enum ScholarshipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "scholarship repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "scholarship repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScholarshipRepository: Send + Sync {
    /// Run a listing query, returning the page window and the total match
    /// count.
    async fn list(
        &self,
        query: &ScholarshipQuery,
    ) -> Result<Paginated<Scholarship>, ScholarshipRepositoryError>;

    /// Fetch one scholarship.
    async fn find_by_id(
        &self,
        id: &ScholarshipId,
    ) -> Result<Option<Scholarship>, ScholarshipRepositoryError>;

    /// Store a new scholarship.
    async fn insert(&self, scholarship: &Scholarship) -> Result<(), ScholarshipRepositoryError>;

    /// Apply a partial update, returning the updated record or `None` when
    /// the scholarship does not exist.
    async fn update(
        &self,
        id: &ScholarshipId,
        patch: &ScholarshipPatch,
    ) -> Result<Option<Scholarship>, ScholarshipRepositoryError>;

    /// Delete a scholarship, returning whether a record was removed.
    async fn delete(&self, id: &ScholarshipId) -> Result<bool, ScholarshipRepositoryError>;
}
