//! Admin dashboard aggregates.

use std::sync::Arc;

use crate::domain::Error;
use crate::domain::ports::{AnalyticsRepository, AnalyticsRepositoryError, AnalyticsSnapshot};

/// Read-only aggregate queries.
#[derive(Clone)]
pub struct AnalyticsService {
    analytics: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    /// Create the service.
    pub fn new(analytics: Arc<dyn AnalyticsRepository>) -> Self {
        Self { analytics }
    }

    /// Current totals and application breakdowns.
    pub async fn snapshot(&self) -> Result<AnalyticsSnapshot, Error> {
        self.analytics.snapshot().await.map_err(|err| match err {
            AnalyticsRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("analytics repository unavailable: {message}"))
            }
            AnalyticsRepositoryError::Query { message } => {
                Error::internal(format!("analytics repository error: {message}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockAnalyticsRepository;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn connection_failure_is_service_unavailable() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_snapshot()
            .returning(|| Err(AnalyticsRepositoryError::connection("pool timed out")));
        let err = AnalyticsService::new(Arc::new(repo))
            .snapshot()
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
