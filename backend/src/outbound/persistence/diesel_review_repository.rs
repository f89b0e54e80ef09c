//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{Review, ReviewEdit, ReviewId, ReviewScope};

use super::diesel_error_mapping::{collect_rows, map_diesel_error, map_pool_error};
use super::models::{ReviewChangeset, ReviewRow};
use super::pool::DbPool;
use super::schema::reviews;

/// Diesel-backed implementation of the review repository port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn scoped(scope: &ReviewScope) -> reviews::BoxedQuery<'static, diesel::pg::Pg> {
    let query = reviews::table.into_boxed();
    match scope {
        ReviewScope::All => query,
        ReviewScope::Scholarship(id) => query.filter(reviews::scholarship_id.eq(*id.as_uuid())),
        ReviewScope::Reviewer(email) => query.filter(reviews::reviewer_email.eq(email.to_string())),
    }
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewRepositoryError::connection))?;

        diesel::insert_into(reviews::table)
            .values(ReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn list(&self, scope: &ReviewScope) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewRepositoryError::connection))?;

        let rows: Vec<ReviewRow> = scoped(scope)
            .select(ReviewRow::as_select())
            .order_by(reviews::review_date.desc())
            .then_order_by(reviews::id.desc())
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        collect_rows(rows, ReviewRepositoryError::query)
    }

    async fn update(
        &self,
        id: &ReviewId,
        edit: &ReviewEdit,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewRepositoryError::connection))?;

        let row: Option<ReviewRow> = diesel::update(reviews::table.find(id.as_uuid()))
            .set(ReviewChangeset::from(edit))
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(Review::try_from)
            .transpose()
            .map_err(ReviewRepositoryError::query)
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewRepositoryError::connection))?;

        let removed = diesel::delete(reviews::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, ScholarshipId};
    use diesel::debug_query;
    use diesel::pg::Pg;
    use rstest::rstest;

    fn sql_for(scope: ReviewScope) -> String {
        let statement = scoped(&scope).select(ReviewRow::as_select());
        debug_query::<Pg, _>(&statement).to_string()
    }

    #[rstest]
    fn all_scope_has_no_filter() {
        assert!(!sql_for(ReviewScope::All).contains("WHERE"));
    }

    #[rstest]
    fn scholarship_scope_filters_on_scholarship_id() {
        let sql = sql_for(ReviewScope::Scholarship(ScholarshipId::random()));
        assert!(sql.contains("\"reviews\".\"scholarship_id\" ="));
    }

    #[rstest]
    fn reviewer_scope_filters_on_email() {
        let email = Email::new("ada@example.com").expect("valid email");
        let sql = sql_for(ReviewScope::Reviewer(email));
        assert!(sql.contains("\"reviews\".\"reviewer_email\" ="));
        assert!(sql.contains("ada@example.com"));
    }
}
