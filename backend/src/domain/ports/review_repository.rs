//! Port for review persistence.

use async_trait::async_trait;

use crate::domain::{Review, ReviewEdit, ReviewId, ReviewScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "review repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Store a new review.
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// List reviews in scope, newest first.
    async fn list(&self, scope: &ReviewScope) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Apply an edit, returning `None` when absent.
    async fn update(
        &self,
        id: &ReviewId,
        edit: &ReviewEdit,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Delete a review, returning whether a record was removed.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError>;
}
