//! PostgreSQL-backed `AnalyticsRepository` implementation using Diesel ORM.
//!
//! Each aggregate is a separate statement on one pooled connection; the
//! snapshot is not taken inside a transaction, so totals may straddle
//! concurrent writes.

use async_trait::async_trait;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::PaymentStatus;
use crate::domain::ports::{
    AnalyticsRepository, AnalyticsRepositoryError, AnalyticsSnapshot, LabelCount,
};

use super::diesel_error_mapping::{from_sql_count, map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::{applications, reviews, scholarships, users};

/// Diesel-backed implementation of the analytics port.
#[derive(Clone)]
pub struct DieselAnalyticsRepository {
    pool: DbPool,
}

impl DieselAnalyticsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> AnalyticsRepositoryError {
    map_diesel_error(
        error,
        AnalyticsRepositoryError::query,
        AnalyticsRepositoryError::connection,
    )
}

/// Sum of application fee plus service charge over paid applications.
macro_rules! collected_fees_statement {
    () => {
        applications::table
            .filter(applications::payment_status.eq(PaymentStatus::Paid.as_str()))
            .select(sum(applications::application_fees + applications::service_charge))
    };
}

/// Application counts grouped by one text column, ordered by label.
macro_rules! label_count_statement {
    ($column:ident) => {
        applications::table
            .group_by(applications::$column)
            .select((applications::$column, count_star()))
            .order_by(applications::$column.asc())
    };
}

fn label_counts(rows: Vec<(String, i64)>) -> Vec<LabelCount> {
    rows.into_iter()
        .map(|(label, count)| LabelCount {
            label,
            count: from_sql_count(count),
        })
        .collect()
}

#[async_trait]
impl AnalyticsRepository for DieselAnalyticsRepository {
    async fn snapshot(&self) -> Result<AnalyticsSnapshot, AnalyticsRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, AnalyticsRepositoryError::connection))?;

        let total_users: i64 = users::table
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;
        let total_scholarships: i64 = scholarships::table
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;
        let total_applications: i64 = applications::table
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;
        let total_reviews: i64 = reviews::table
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        let collected_fees: Option<f64> = collected_fees_statement!()
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        let by_status: Vec<(String, i64)> = label_count_statement!(application_status)
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        let by_category: Vec<(String, i64)> = label_count_statement!(scholarship_category)
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(AnalyticsSnapshot {
            total_users: from_sql_count(total_users),
            total_scholarships: from_sql_count(total_scholarships),
            total_applications: from_sql_count(total_applications),
            total_reviews: from_sql_count(total_reviews),
            collected_fees: collected_fees.unwrap_or_default(),
            applications_by_status: label_counts(by_status),
            applications_by_category: label_counts(by_category),
        })
    }
}
