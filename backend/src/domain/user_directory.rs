//! User registration and the admin user directory.

use std::sync::Arc;

use mockable::Clock;
use pagination::Paginated;
use tracing::{debug, info};

use crate::domain::application_reconciler::parse_email;
use crate::domain::listing::{ListingParams, UserQuery};
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::validation::{FieldName, optional_text, require_text};
use crate::domain::{Error, NewUser, User, UserRegistration};

const EMAIL: FieldName = FieldName::new("email");

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

/// Unvalidated registration body. Any client-supplied role is ignored before
/// it gets here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// Registration and lookup of user accounts.
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserDirectory {
    /// Create the service.
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Register an account, idempotently by email. New accounts are
    /// students.
    pub async fn register(&self, input: RegistrationInput) -> Result<UserRegistration, Error> {
        let email = parse_email(require_text(input.email, EMAIL)?, EMAIL)?;
        let user = NewUser {
            email,
            name: optional_text(input.name),
            photo_url: optional_text(input.photo_url),
        }
        .into_user(self.clock.utc());

        let inserted = self
            .users
            .insert_if_absent(&user)
            .await
            .map_err(map_user_error)?;
        if inserted {
            info!(user_id = %user.id, "user registered");
            Ok(UserRegistration::Created(user))
        } else {
            debug!("registration skipped for existing email");
            Ok(UserRegistration::AlreadyRegistered)
        }
    }

    /// Admin listing with search over name and email.
    pub async fn list(&self, params: &ListingParams) -> Result<Paginated<User>, Error> {
        self.users
            .list(&UserQuery::admin(params))
            .await
            .map_err(map_user_error)
    }

    /// Look up one user by email.
    pub async fn find(&self, raw_email: &str) -> Result<User, Error> {
        let email = parse_email(raw_email.to_owned(), EMAIL)?;
        self.users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {email} not found")))
    }
}
