//! Read-side port for admin dashboard aggregates.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised when computing analytics aggregates.
    pub enum AnalyticsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "analytics read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "analytics read query failed: {message}",
    }
}

/// A label with the number of applications carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Collection totals and application breakdowns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsSnapshot {
    pub total_users: u64,
    pub total_scholarships: u64,
    pub total_applications: u64,
    pub total_reviews: u64,
    /// Application fees plus service charges over paid applications.
    pub collected_fees: f64,
    /// Ordered by label.
    pub applications_by_status: Vec<LabelCount>,
    /// Ordered by label.
    pub applications_by_category: Vec<LabelCount>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Compute the current aggregates.
    async fn snapshot(&self) -> Result<AnalyticsSnapshot, AnalyticsRepositoryError>;
}
