//! Scholarship applications.
//!
//! An application is keyed by the `(scholarship, applicant email)` pair. The
//! scholarship fields it carries are a snapshot taken when the reconciler
//! last wrote it, so later edits to the scholarship do not rewrite history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Email, FeeAmount, Scholarship, ScholarshipId};

/// Stable application identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(Uuid);

impl ApplicationId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApplicationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Whether the application fee has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    /// Stored and serialised spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "paid" => Ok(Self::Paid),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// Processing state set by moderators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Processing,
    Approved,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Approved,
        Self::Completed,
        Self::Rejected,
    ];

    /// Stored and serialised spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("unknown application status: {s}"))
    }
}

/// Natural key of an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationKey {
    pub scholarship_id: ScholarshipId,
    pub user_email: Email,
}

/// Scholarship fields copied onto an application at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationSnapshot {
    pub scholarship_name: String,
    pub university_name: String,
    pub scholarship_category: String,
    pub subject_category: String,
    pub degree: String,
    pub application_fees: FeeAmount,
    pub service_charge: FeeAmount,
}

impl ApplicationSnapshot {
    /// Copy the denormalised fields, defaulting absent fees to zero.
    pub fn of(scholarship: &Scholarship) -> Self {
        Self {
            scholarship_name: scholarship.scholarship_name.clone(),
            university_name: scholarship.university_name.clone(),
            scholarship_category: scholarship.scholarship_category.clone(),
            subject_category: scholarship.subject_category.clone(),
            degree: scholarship.degree.clone(),
            application_fees: scholarship.application_fee_or_zero(),
            service_charge: scholarship.service_charge_or_zero(),
        }
    }
}

/// A stored application.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub id: ApplicationId,
    pub key: ApplicationKey,
    pub user_name: String,
    pub snapshot: ApplicationSnapshot,
    pub payment_status: PaymentStatus,
    pub application_status: ApplicationStatus,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
    pub application_date: DateTime<Utc>,
}

impl Application {
    /// Only pending applications may be withdrawn.
    pub fn is_removable(&self) -> bool {
        self.application_status == ApplicationStatus::Pending
    }
}

/// Values written by one reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationUpsert {
    pub key: ApplicationKey,
    pub user_name: String,
    pub snapshot: ApplicationSnapshot,
    pub payment_status: PaymentStatus,
    pub written_at: DateTime<Utc>,
}

impl ApplicationUpsert {
    /// The record to insert when the key is new.
    pub fn into_new_application(self) -> Application {
        Application {
            id: ApplicationId::random(),
            key: self.key,
            user_name: self.user_name,
            snapshot: self.snapshot,
            payment_status: self.payment_status,
            application_status: ApplicationStatus::Pending,
            feedback: String::new(),
            created_at: self.written_at,
            application_date: self.written_at,
        }
    }

    /// Overwrite the mutable fields of an existing record. Creation time,
    /// feedback and processing status are left untouched.
    pub fn apply_to(self, existing: &mut Application) {
        existing.user_name = self.user_name;
        existing.snapshot = self.snapshot;
        existing.payment_status = self.payment_status;
        existing.application_date = self.written_at;
    }
}

/// Whether a reconciliation inserted or updated.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Created(Application),
    Updated(Application),
}

impl ReconcileOutcome {
    /// The written application.
    pub fn application(&self) -> &Application {
        match self {
            Self::Created(application) | Self::Updated(application) => application,
        }
    }

    /// Consume the outcome, keeping the application.
    pub fn into_application(self) -> Application {
        match self {
            Self::Created(application) | Self::Updated(application) => application,
        }
    }

    /// True when a new record was inserted.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Moderator update; at least one field must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationReview {
    pub application_status: Option<ApplicationStatus>,
    pub feedback: Option<String>,
}

impl ApplicationReview {
    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.application_status.is_none() && self.feedback.is_none()
    }

    /// Apply to an in-memory record.
    pub fn apply_to(&self, target: &mut Application) {
        if let Some(status) = self.application_status {
            target.application_status = status;
        }
        if let Some(feedback) = &self.feedback {
            target.feedback.clone_from(feedback);
        }
    }
}

/// Unvalidated reconciliation input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileRequest {
    pub scholarship_id: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub payment_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScholarshipDraft;
    use chrono::Duration;
    use rstest::{fixture, rstest};

    #[fixture]
    fn scholarship() -> Scholarship {
        ScholarshipDraft {
            scholarship_name: "Oxford Merit Award".to_owned(),
            university_name: "University of Oxford".to_owned(),
            university_image: None,
            university_country: "United Kingdom".to_owned(),
            university_city: None,
            university_world_rank: None,
            subject_category: "Engineering".to_owned(),
            scholarship_category: "Full fund".to_owned(),
            degree: "Masters".to_owned(),
            tuition_fees: None,
            application_fees: FeeAmount::new(25.0).ok(),
            service_charge: None,
            application_deadline: None,
            posted_by: None,
        }
        .publish(Utc::now())
    }

    fn upsert(
        scholarship: &Scholarship,
        payment: PaymentStatus,
        at: DateTime<Utc>,
    ) -> ApplicationUpsert {
        ApplicationUpsert {
            key: ApplicationKey {
                scholarship_id: scholarship.id,
                user_email: Email::new("ada@example.com").expect("valid"),
            },
            user_name: "Ada".to_owned(),
            snapshot: ApplicationSnapshot::of(scholarship),
            payment_status: payment,
            written_at: at,
        }
    }

    #[rstest]
    fn snapshot_defaults_missing_fees_to_zero(scholarship: Scholarship) {
        let snapshot = ApplicationSnapshot::of(&scholarship);
        assert_eq!(snapshot.application_fees.value(), 25.0);
        assert_eq!(snapshot.service_charge, FeeAmount::ZERO);
    }

    #[rstest]
    fn update_preserves_created_at_feedback_and_status(scholarship: Scholarship) {
        let first = Utc::now();
        let mut application =
            upsert(&scholarship, PaymentStatus::Unpaid, first).into_new_application();
        application.feedback = "Looks good".to_owned();
        application.application_status = ApplicationStatus::Processing;

        let later = first + Duration::minutes(5);
        upsert(&scholarship, PaymentStatus::Paid, later).apply_to(&mut application);

        assert_eq!(application.created_at, first);
        assert_eq!(application.application_date, later);
        assert_eq!(application.payment_status, PaymentStatus::Paid);
        assert_eq!(application.feedback, "Looks good");
        assert_eq!(application.application_status, ApplicationStatus::Processing);
    }

    #[rstest]
    #[case(ApplicationStatus::Pending, true)]
    #[case(ApplicationStatus::Processing, false)]
    #[case(ApplicationStatus::Approved, false)]
    #[case(ApplicationStatus::Completed, false)]
    #[case(ApplicationStatus::Rejected, false)]
    fn only_pending_is_removable(
        scholarship: Scholarship,
        #[case] status: ApplicationStatus,
        #[case] removable: bool,
    ) {
        let mut application =
            upsert(&scholarship, PaymentStatus::Paid, Utc::now()).into_new_application();
        application.application_status = status;
        assert_eq!(application.is_removable(), removable);
    }

    #[rstest]
    #[case("paid", Some(PaymentStatus::Paid))]
    #[case(" unpaid ", Some(PaymentStatus::Unpaid))]
    #[case("PAID", None)]
    #[case("refunded", None)]
    fn payment_status_parses_exact_spelling(
        #[case] raw: &str,
        #[case] expected: Option<PaymentStatus>,
    ) {
        assert_eq!(raw.parse::<PaymentStatus>().ok(), expected);
    }

    #[rstest]
    fn application_status_round_trips_its_spelling() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
    }
}
