//! PostgreSQL-backed `ScholarshipRepository` implementation using Diesel ORM.
//!
//! Listing queries are built as boxed statements so the same filter feeds
//! both the `COUNT(*)` and the windowed `SELECT`. Search terms become
//! escaped `ILIKE` patterns; Postgres treats `\` as the default escape
//! character.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::expression::BoxableExpression;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Double, Nullable};
use diesel_async::RunQueryDsl;
use pagination::Paginated;

use crate::domain::listing::{ScholarshipFilter, ScholarshipSearchField, SortMode};
use crate::domain::ports::{ScholarshipRepository, ScholarshipRepositoryError};
use crate::domain::{Scholarship, ScholarshipId, ScholarshipPatch, ScholarshipQuery};

use super::diesel_error_mapping::{
    collect_rows, from_sql_count, map_diesel_error, map_pool_error, to_sql_bigint,
};
use super::models::{ScholarshipChangeset, ScholarshipRow};
use super::pool::DbPool;
use super::schema::scholarships;

diesel::define_sql_function! {
    /// `COALESCE` for nullable fee columns, so missing fees sort as zero.
    fn coalesce(value: Nullable<Double>, fallback: Double) -> Double;
}

type SearchClause = Box<dyn BoxableExpression<scholarships::table, Pg, SqlType = Bool>>;

/// Diesel-backed implementation of the scholarship repository port.
#[derive(Clone)]
pub struct DieselScholarshipRepository {
    pool: DbPool,
}

impl DieselScholarshipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> ScholarshipRepositoryError {
    map_diesel_error(
        error,
        ScholarshipRepositoryError::query,
        ScholarshipRepositoryError::connection,
    )
}

fn search_clause(filter: &ScholarshipFilter) -> Option<SearchClause> {
    let pattern = filter.search()?.like_pattern();
    filter
        .search_fields()
        .iter()
        .map(|field| -> SearchClause {
            match field {
                ScholarshipSearchField::ScholarshipName => {
                    Box::new(scholarships::scholarship_name.ilike(pattern.clone()))
                }
                ScholarshipSearchField::UniversityName => {
                    Box::new(scholarships::university_name.ilike(pattern.clone()))
                }
                ScholarshipSearchField::Degree => {
                    Box::new(scholarships::degree.ilike(pattern.clone()))
                }
            }
        })
        .reduce(|acc, next| -> SearchClause { Box::new(acc.or(next)) })
}

fn filtered(filter: &ScholarshipFilter) -> scholarships::BoxedQuery<'static, Pg> {
    let mut query = scholarships::table.into_boxed();
    if let Some(clause) = search_clause(filter) {
        query = query.filter(clause);
    }
    if let Some(category) = filter.category() {
        query = query.filter(scholarships::scholarship_category.eq(category.to_owned()));
    }
    if let Some(country) = filter.country() {
        query = query.filter(scholarships::university_country.eq(country.to_owned()));
    }
    query
}

fn ordered(
    query: scholarships::BoxedQuery<'static, Pg>,
    sort: SortMode,
) -> scholarships::BoxedQuery<'static, Pg> {
    let application_fee = coalesce(scholarships::application_fees, 0.0);
    let tuition_fee = coalesce(scholarships::tuition_fees, 0.0);
    match sort {
        SortMode::FeeLow => query
            .order_by(application_fee.asc())
            .then_order_by(tuition_fee.asc())
            .then_order_by(scholarships::id.asc()),
        SortMode::FeeHigh => query
            .order_by(application_fee.desc())
            .then_order_by(tuition_fee.desc())
            .then_order_by(scholarships::id.desc()),
        SortMode::Recent => query
            .order_by(scholarships::post_date.desc())
            .then_order_by(scholarships::id.desc()),
        SortMode::TuitionLow => query
            .order_by(tuition_fee.asc())
            .then_order_by(application_fee.asc())
            .then_order_by(scholarships::id.asc()),
    }
}

fn to_domain(rows: Vec<ScholarshipRow>) -> Result<Vec<Scholarship>, ScholarshipRepositoryError> {
    collect_rows(rows, ScholarshipRepositoryError::query)
}

#[async_trait]
impl ScholarshipRepository for DieselScholarshipRepository {
    async fn list(
        &self,
        query: &ScholarshipQuery,
    ) -> Result<Paginated<Scholarship>, ScholarshipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ScholarshipRepositoryError::connection))?;

        let total: i64 = filtered(&query.filter)
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        let rows: Vec<ScholarshipRow> = ordered(filtered(&query.filter), query.sort)
            .select(ScholarshipRow::as_select())
            .offset(to_sql_bigint(query.page.skip()))
            .limit(to_sql_bigint(query.page.limit()))
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(Paginated::new(
            to_domain(rows)?,
            query.page,
            from_sql_count(total),
        ))
    }

    async fn find_by_id(
        &self,
        id: &ScholarshipId,
    ) -> Result<Option<Scholarship>, ScholarshipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ScholarshipRepositoryError::connection))?;

        let row: Option<ScholarshipRow> = scholarships::table
            .find(id.as_uuid())
            .select(ScholarshipRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(Scholarship::try_from)
            .transpose()
            .map_err(ScholarshipRepositoryError::query)
    }

    async fn insert(&self, scholarship: &Scholarship) -> Result<(), ScholarshipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ScholarshipRepositoryError::connection))?;

        diesel::insert_into(scholarships::table)
            .values(ScholarshipRow::from(scholarship))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn update(
        &self,
        id: &ScholarshipId,
        patch: &ScholarshipPatch,
    ) -> Result<Option<Scholarship>, ScholarshipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ScholarshipRepositoryError::connection))?;

        let row: Option<ScholarshipRow> = diesel::update(scholarships::table.find(id.as_uuid()))
            .set(ScholarshipChangeset::from(patch))
            .returning(ScholarshipRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(Scholarship::try_from)
            .transpose()
            .map_err(ScholarshipRepositoryError::query)
    }

    async fn delete(&self, id: &ScholarshipId) -> Result<bool, ScholarshipRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ScholarshipRepositoryError::connection))?;

        let removed = diesel::delete(scholarships::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingParams;
    use diesel::debug_query;
    use rstest::rstest;

    fn sql_for(params: ListingParams) -> String {
        sql_for_query(&ScholarshipQuery::public(&params))
    }

    fn sql_for_query(query: &ScholarshipQuery) -> String {
        let statement = ordered(filtered(&query.filter), query.sort)
            .select(ScholarshipRow::as_select())
            .offset(to_sql_bigint(query.page.skip()))
            .limit(to_sql_bigint(query.page.limit()));
        debug_query::<Pg, _>(&statement).to_string()
    }

    #[rstest]
    fn search_ors_public_fields_with_escaped_pattern() {
        let sql = sql_for(ListingParams {
            search: Some("50%".to_owned()),
            ..ListingParams::default()
        });
        assert!(sql.contains("\"scholarship_name\" ILIKE"));
        assert!(sql.contains("\"university_name\" ILIKE"));
        assert!(sql.contains("\"degree\" ILIKE"));
        assert!(sql.contains("%50\\\\%%"), "pattern escaped in binds: {sql}");
    }

    #[rstest]
    fn fee_high_orders_by_coalesced_fees_descending() {
        let sql = sql_for(ListingParams {
            sort_by: Some("fee-high".to_owned()),
            ..ListingParams::default()
        });
        assert!(sql.contains("coalesce("), "coalesced ordering: {sql}");
        assert!(sql.contains("DESC"));
    }

    #[rstest]
    fn top_listing_orders_by_tuition_first() {
        let sql = sql_for_query(&ScholarshipQuery::top());
        let order = sql.split("ORDER BY").nth(1).expect("order clause");
        let tuition = order.find("\"tuition_fees\"").expect("tuition ordering");
        let application = order
            .find("\"application_fees\"")
            .expect("application fee ordering");
        assert!(tuition < application, "tuition sorts first: {sql}");
        assert!(!order.contains("DESC"), "ascending only: {sql}");
    }

    #[rstest]
    fn sentinel_category_adds_no_filter() {
        let sql = sql_for(ListingParams {
            category: Some("all".to_owned()),
            ..ListingParams::default()
        });
        assert!(!sql.contains("\"scholarship_category\" ="));
    }
}
