//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::{Email, User, UserQuery};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user unless one with the same email exists. Returns
    /// whether a record was written.
    async fn insert_if_absent(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Run the admin listing query.
    async fn list(&self, query: &UserQuery) -> Result<Paginated<User>, UserPersistenceError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;
}
