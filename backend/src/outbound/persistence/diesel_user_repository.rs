//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Registration relies on the `users_email_key` unique constraint:
//! `ON CONFLICT (email) DO NOTHING` writes zero rows for a known email, so
//! concurrent sign-ins for the same account never create duplicates.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Paginated;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserQuery};

use super::diesel_error_mapping::{
    collect_rows, from_sql_count, map_diesel_error, map_pool_error, to_sql_bigint,
};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn filtered(query: &UserQuery) -> users::BoxedQuery<'static, Pg> {
    let mut statement = users::table.into_boxed();
    if let Some(term) = &query.search {
        let pattern = term.like_pattern();
        statement = statement.filter(
            users::name
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern)),
        );
    }
    statement
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert_if_absent(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let written = diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .on_conflict(users::email)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(written == 1)
    }

    async fn list(&self, query: &UserQuery) -> Result<Paginated<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let total: i64 = filtered(query)
            .select(count_star())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        let rows: Vec<UserRow> = filtered(query)
            .select(UserRow::as_select())
            .order_by(users::created_at.desc())
            .then_order_by(users::id.desc())
            .offset(to_sql_bigint(query.page.skip()))
            .limit(to_sql_bigint(query.page.limit()))
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(Paginated::new(
            collect_rows(rows, UserPersistenceError::query)?,
            query.page,
            from_sql_count(total),
        ))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(User::try_from)
            .transpose()
            .map_err(UserPersistenceError::query)
    }
}
