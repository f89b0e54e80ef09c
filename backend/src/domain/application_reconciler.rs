//! Create-or-update of the single application per scholarship and applicant.
//!
//! The reconciler validates input, snapshots the scholarship, and hands one
//! atomic upsert to the repository. It holds no lock: concurrent calls for the
//! same key converge because the store resolves the conflict.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, ScholarshipRepository,
};
use crate::domain::scholarship_catalogue::{
    map_scholarship_error, parse_scholarship_id, scholarship_not_found,
};
use crate::domain::validation::{FieldName, invalid_value_error, require_text};
use crate::domain::{
    ApplicationKey, ApplicationSnapshot, ApplicationUpsert, Email, Error, PaymentStatus,
    ReconcileOutcome, ReconcileRequest,
};

pub(crate) const SCHOLARSHIP_ID: FieldName = FieldName::new("scholarshipId");
pub(crate) const USER_EMAIL: FieldName = FieldName::new("userEmail");
const PAYMENT_STATUS: FieldName = FieldName::new("paymentStatus");

pub(crate) fn map_application_error(error: ApplicationRepositoryError) -> Error {
    match error {
        ApplicationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("application repository unavailable: {message}"))
        }
        ApplicationRepositoryError::Query { message } => {
            Error::internal(format!("application repository error: {message}"))
        }
    }
}

pub(crate) fn parse_email(raw: String, field: FieldName) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| invalid_value_error(field, err))
}

#[derive(Debug)]
struct ValidatedRequest {
    scholarship_id: String,
    user_email: Email,
    user_name: String,
    payment_status: PaymentStatus,
}

fn validate(request: ReconcileRequest) -> Result<ValidatedRequest, Error> {
    let scholarship_id = require_text(request.scholarship_id, SCHOLARSHIP_ID)?;
    let user_email = parse_email(require_text(request.user_email, USER_EMAIL)?, USER_EMAIL)?;
    let payment_status = require_text(request.payment_status, PAYMENT_STATUS)?
        .parse()
        .map_err(|reason: String| invalid_value_error(PAYMENT_STATUS, reason))?;
    Ok(ValidatedRequest {
        scholarship_id,
        user_email,
        user_name: request.user_name.map(|n| n.trim().to_owned()).unwrap_or_default(),
        payment_status,
    })
}

/// Maintains exactly one application per `(scholarship, applicant)` pair.
#[derive(Clone)]
pub struct ApplicationReconciler {
    scholarships: Arc<dyn ScholarshipRepository>,
    applications: Arc<dyn ApplicationRepository>,
    clock: Arc<dyn Clock>,
}

impl ApplicationReconciler {
    /// Create the reconciler over its repositories and clock.
    pub fn new(
        scholarships: Arc<dyn ScholarshipRepository>,
        applications: Arc<dyn ApplicationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scholarships,
            applications,
            clock,
        }
    }

    /// Validate, snapshot and upsert.
    ///
    /// Validation failures and an unknown scholarship are reported before any
    /// write. Repeating a call with the same key updates the existing record.
    pub async fn reconcile(&self, request: ReconcileRequest) -> Result<ReconcileOutcome, Error> {
        let request = validate(request)?;
        let scholarship_id = parse_scholarship_id(&request.scholarship_id, SCHOLARSHIP_ID)?;
        let scholarship = self
            .scholarships
            .find_by_id(&scholarship_id)
            .await
            .map_err(map_scholarship_error)?
            .ok_or_else(|| scholarship_not_found(&scholarship_id))?;

        let upsert = ApplicationUpsert {
            key: ApplicationKey {
                scholarship_id,
                user_email: request.user_email,
            },
            user_name: request.user_name,
            snapshot: ApplicationSnapshot::of(&scholarship),
            payment_status: request.payment_status,
            written_at: self.clock.utc(),
        };
        let outcome = self
            .applications
            .upsert(&upsert)
            .await
            .map_err(map_application_error)?;

        info!(
            application_id = %outcome.application().id,
            scholarship_id = %scholarship_id,
            created = outcome.is_created(),
            payment_status = upsert.payment_status.as_str(),
            "application reconciled"
        );
        Ok(outcome)
    }
}
