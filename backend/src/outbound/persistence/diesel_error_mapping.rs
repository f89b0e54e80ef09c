//! Shared Diesel and pool error mapping for the repositories.
//!
//! Every repository port error has `Connection` and `Query` variants, so the
//! helpers take the two constructors and stay generic over the port.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query or connection errors.
///
/// Database messages are logged at debug level and replaced by a generic
/// description so driver details never reach the domain.
pub(crate) fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("database constraint violated")
        }
        DieselError::DeserializationError(_) => query("database row decode error"),
        _ => query("database error"),
    }
}

/// Convert rows into domain values, mapping the first failure.
pub(crate) fn collect_rows<R, T, E>(
    rows: Vec<R>,
    query: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|message| query(format!("row conversion failed: {message}")))
}

/// Clamp a `u64` count or offset into Postgres' `BIGINT`.
pub(crate) fn to_sql_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Read back a `COUNT(*)`; negative counts cannot occur.
pub(crate) fn from_sql_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
