//! Application queries, moderator updates and withdrawal.

use std::sync::Arc;

use tracing::info;

use crate::domain::application_reconciler::{map_application_error, parse_email};
use crate::domain::ports::{ApplicationRepository, ApplicationScope, PendingRemoval};
use crate::domain::validation::{
    FieldName, invalid_identifier_error, invalid_value_error, optional_text,
};
use crate::domain::{Application, ApplicationId, ApplicationReview, ApplicationStatus, Error};

const ID: FieldName = FieldName::new("id");
const EMAIL: FieldName = FieldName::new("email");
const APPLICATION_STATUS: FieldName = FieldName::new("applicationStatus");

fn parse_application_id(raw: &str) -> Result<ApplicationId, Error> {
    raw.parse().map_err(|_| invalid_identifier_error(ID))
}

fn application_not_found(id: &ApplicationId) -> Error {
    Error::not_found(format!("application {id} not found"))
}

/// Unvalidated moderator update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationReviewInput {
    pub application_status: Option<String>,
    pub feedback: Option<String>,
}

impl ApplicationReviewInput {
    fn validate(self) -> Result<ApplicationReview, Error> {
        let application_status = optional_text(self.application_status)
            .map(|raw| {
                raw.parse::<ApplicationStatus>()
                    .map_err(|reason| invalid_value_error(APPLICATION_STATUS, reason))
            })
            .transpose()?;
        let review = ApplicationReview {
            application_status,
            feedback: self.feedback,
        };
        if review.is_empty() {
            return Err(Error::invalid_request(
                "applicationStatus or feedback is required",
            ));
        }
        Ok(review)
    }
}

/// Read and maintain stored applications.
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
}

impl ApplicationService {
    /// Create the service over a repository.
    pub fn new(applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { applications }
    }

    /// List one applicant's applications, or all when `email` is absent.
    pub async fn list(&self, email: Option<String>) -> Result<Vec<Application>, Error> {
        let scope = match optional_text(email) {
            Some(raw) => ApplicationScope::Applicant(parse_email(raw, EMAIL)?),
            None => ApplicationScope::All,
        };
        self.applications
            .list(&scope)
            .await
            .map_err(map_application_error)
    }

    /// Fetch one application.
    pub async fn get(&self, raw_id: &str) -> Result<Application, Error> {
        let id = parse_application_id(raw_id)?;
        self.applications
            .find_by_id(&id)
            .await
            .map_err(map_application_error)?
            .ok_or_else(|| application_not_found(&id))
    }

    /// Set processing status and/or feedback.
    pub async fn review(
        &self,
        raw_id: &str,
        input: ApplicationReviewInput,
    ) -> Result<Application, Error> {
        let id = parse_application_id(raw_id)?;
        let review = input.validate()?;
        let updated = self
            .applications
            .review(&id, &review)
            .await
            .map_err(map_application_error)?
            .ok_or_else(|| application_not_found(&id))?;
        info!(
            application_id = %id,
            status = updated.application_status.as_str(),
            "application reviewed"
        );
        Ok(updated)
    }

    /// Withdraw an application. Only pending applications may be removed.
    pub async fn withdraw(&self, raw_id: &str) -> Result<(), Error> {
        let id = parse_application_id(raw_id)?;
        match self
            .applications
            .remove_if_pending(&id)
            .await
            .map_err(map_application_error)?
        {
            PendingRemoval::Removed => {
                info!(application_id = %id, "application withdrawn");
                Ok(())
            }
            PendingRemoval::NotPending => Err(Error::forbidden(
                "only pending applications can be deleted",
            )),
            PendingRemoval::Missing => Err(application_not_found(&id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockApplicationRepository;
    use rstest::rstest;

    fn service(repo: MockApplicationRepository) -> ApplicationService {
        ApplicationService::new(Arc::new(repo))
    }

    #[rstest]
    #[case(PendingRemoval::Removed, None)]
    #[case(PendingRemoval::NotPending, Some(ErrorCode::Forbidden))]
    #[case(PendingRemoval::Missing, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn withdraw_maps_removal_outcome(
        #[case] outcome: PendingRemoval,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut repo = MockApplicationRepository::new();
        repo.expect_remove_if_pending()
            .times(1)
            .returning(move |_| Ok(outcome));
        let result = service(repo)
            .withdraw(&ApplicationId::random().to_string())
            .await;
        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn review_requires_a_field() {
        let mut repo = MockApplicationRepository::new();
        repo.expect_review().never();
        let err = service(repo)
            .review(
                &ApplicationId::random().to_string(),
                ApplicationReviewInput::default(),
            )
            .await
            .expect_err("empty review");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn review_rejects_unknown_status() {
        let err = service(MockApplicationRepository::new())
            .review(
                &ApplicationId::random().to_string(),
                ApplicationReviewInput {
                    application_status: Some("archived".to_owned()),
                    feedback: None,
                },
            )
            .await
            .expect_err("unknown status");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn list_scopes_by_email_when_present() {
        let mut repo = MockApplicationRepository::new();
        repo.expect_list()
            .withf(|scope| {
                matches!(
                    scope,
                    ApplicationScope::Applicant(email) if email.as_ref() == "ada@example.com"
                )
            })
            .returning(|_| Ok(Vec::new()));
        let listed = service(repo)
            .list(Some("ada@example.com".to_owned()))
            .await
            .expect("listed");
        assert!(listed.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn blank_email_lists_everything() {
        let mut repo = MockApplicationRepository::new();
        repo.expect_list()
            .withf(|scope| *scope == ApplicationScope::All)
            .returning(|_| Ok(Vec::new()));
        service(repo).list(Some(" ".to_owned())).await.expect("listed");
    }
}
