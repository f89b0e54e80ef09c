//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.
//!
//! Reconciliation is a single `INSERT ... ON CONFLICT (scholarship_id,
//! user_email) DO UPDATE ... RETURNING` statement. The returned row keeps its
//! original identifier on conflict, so comparing it with the identifier we
//! proposed tells an insert from an update.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, ApplicationScope, PendingRemoval,
};
use crate::domain::{
    Application, ApplicationId, ApplicationReview, ApplicationStatus, ApplicationUpsert,
    ReconcileOutcome,
};

use super::diesel_error_mapping::{collect_rows, map_diesel_error, map_pool_error};
use super::models::{ApplicationReviewChangeset, ApplicationRow};
use super::pool::DbPool;
use super::schema::applications;

/// Diesel-backed implementation of the application repository port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    map_diesel_error(
        error,
        ApplicationRepositoryError::query,
        ApplicationRepositoryError::connection,
    )
}

fn map_row(row: ApplicationRow) -> Result<Application, ApplicationRepositoryError> {
    Application::try_from(row).map_err(ApplicationRepositoryError::query)
}

/// The reconciliation upsert for one candidate row.
///
/// A conflicting row keeps its `id`, `created_at`, `application_status` and
/// `feedback`; every column listed here takes the candidate's value.
macro_rules! reconcile_statement {
    (@columns $candidate:expr, [$($column:ident),+ $(,)?]) => {
        diesel::insert_into(applications::table)
            .values($candidate)
            .on_conflict((applications::scholarship_id, applications::user_email))
            .do_update()
            .set(($(applications::$column.eq(excluded(applications::$column)),)+))
    };
    ($candidate:expr) => {
        reconcile_statement!(@columns $candidate, [
            user_name,
            scholarship_name,
            university_name,
            scholarship_category,
            subject_category,
            degree,
            application_fees,
            service_charge,
            payment_status,
            application_date,
        ])
    };
}

fn classify(proposed_id: Uuid, stored: Application) -> ReconcileOutcome {
    if *stored.id.as_uuid() == proposed_id {
        ReconcileOutcome::Created(stored)
    } else {
        ReconcileOutcome::Updated(stored)
    }
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn upsert(
        &self,
        upsert: &ApplicationUpsert,
    ) -> Result<ReconcileOutcome, ApplicationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ApplicationRepositoryError::connection))?;

        let candidate = ApplicationRow::from(&upsert.clone().into_new_application());
        let proposed_id = candidate.id;

        let row: ApplicationRow = reconcile_statement!(&candidate)
            .returning(ApplicationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(classify(proposed_id, map_row(row)?))
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ApplicationRepositoryError::connection))?;

        let row: Option<ApplicationRow> = applications::table
            .find(id.as_uuid())
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(map_row).transpose()
    }

    async fn list(
        &self,
        scope: &ApplicationScope,
    ) -> Result<Vec<Application>, ApplicationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ApplicationRepositoryError::connection))?;

        let mut query = applications::table
            .select(ApplicationRow::as_select())
            .order_by(applications::application_date.desc())
            .then_order_by(applications::id.desc())
            .into_boxed();
        if let ApplicationScope::Applicant(email) = scope {
            query = query.filter(applications::user_email.eq(email.to_string()));
        }

        let rows: Vec<ApplicationRow> = query.load(&mut conn).await.map_err(map_error)?;
        collect_rows(rows, ApplicationRepositoryError::query)
    }

    async fn review(
        &self,
        id: &ApplicationId,
        review: &ApplicationReview,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ApplicationRepositoryError::connection))?;

        let row: Option<ApplicationRow> = diesel::update(applications::table.find(id.as_uuid()))
            .set(ApplicationReviewChangeset::from(review))
            .returning(ApplicationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(map_row).transpose()
    }

    async fn remove_if_pending(
        &self,
        id: &ApplicationId,
    ) -> Result<PendingRemoval, ApplicationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ApplicationRepositoryError::connection))?;

        let removed = diesel::delete(
            applications::table
                .find(id.as_uuid())
                .filter(applications::application_status.eq(ApplicationStatus::Pending.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_error)?;
        if removed > 0 {
            return Ok(PendingRemoval::Removed);
        }

        let still_present: i64 = applications::table
            .find(id.as_uuid())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(if still_present > 0 {
            PendingRemoval::NotPending
        } else {
            PendingRemoval::Missing
        })
    }
}
