//! Port for application persistence.

use async_trait::async_trait;

use crate::domain::{
    Application, ApplicationId, ApplicationReview, ApplicationUpsert, Email, ReconcileOutcome,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "application repository query failed: {message}",
    }
}

/// Which applications to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    Applicant(Email),
}

/// Result of a conditional delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRemoval {
    /// The application was pending and has been removed.
    Removed,
    /// The application exists but is no longer pending.
    NotPending,
    /// No application has the identifier.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Atomically insert or update the application for the upsert's key.
    ///
    /// Implementations must never create a second record for the same key,
    /// even under concurrent calls.
    async fn upsert(
        &self,
        upsert: &ApplicationUpsert,
    ) -> Result<ReconcileOutcome, ApplicationRepositoryError>;

    /// Fetch one application.
    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// List applications, newest first.
    async fn list(
        &self,
        scope: &ApplicationScope,
    ) -> Result<Vec<Application>, ApplicationRepositoryError>;

    /// Apply a moderator update, returning `None` when absent.
    async fn review(
        &self,
        id: &ApplicationId,
        review: &ApplicationReview,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Delete the application only while it is pending.
    async fn remove_if_pending(
        &self,
        id: &ApplicationId,
    ) -> Result<PendingRemoval, ApplicationRepositoryError>;
}
