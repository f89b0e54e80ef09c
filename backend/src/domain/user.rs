//! User accounts and the email address type used as their natural key.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for [`Email`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was blank.
    #[error("email must not be empty")]
    Empty,
    /// The address lacks a local part, an `@`, or a domain.
    #[error("email must look like name@domain")]
    Malformed,
}

/// A trimmed email address.
///
/// Only the shape `local@domain` is checked; deliverability is the identity
/// provider's concern. Comparison is exact, matching how records are keyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an address.
    ///
    /// # Examples
    /// ```
    /// use scholarlink::domain::Email;
    ///
    /// let email = Email::new(" ada@example.com ").expect("valid email");
    /// assert_eq!(email.as_ref(), "ada@example.com");
    /// assert!(Email::new("ada.example.com").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(EmailValidationError::Malformed),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorisation role. New accounts are always students; promotion happens
/// out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Default role for self-registered accounts.
    #[default]
    Student,
    /// Reviews and processes applications.
    Moderator,
    /// Full administrative access.
    Admin,
}

impl Role {
    /// Stored and serialised spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Moderator => "Moderator",
            Self::Admin => "Admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Self::Student),
            "Moderator" => Ok(Self::Moderator),
            "Admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration input. The role is deliberately absent: clients cannot pick it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: Email,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

impl NewUser {
    /// Materialise the account with a fresh identifier and the default role.
    pub fn into_user(self, created_at: DateTime<Utc>) -> User {
        User {
            id: UserId::random(),
            email: self.email,
            name: self.name,
            photo_url: self.photo_url,
            role: Role::default(),
            created_at,
        }
    }
}

/// Result of an idempotent registration.
#[derive(Debug, Clone, PartialEq)]
pub enum UserRegistration {
    /// A new account was stored.
    Created(User),
    /// An account with the same email already existed; nothing was written.
    AlreadyRegistered,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("ada", EmailValidationError::Malformed)]
    #[case("@example.com", EmailValidationError::Malformed)]
    #[case("ada@", EmailValidationError::Malformed)]
    #[case("ada@b@c", EmailValidationError::Malformed)]
    fn email_rejects_malformed(#[case] raw: &str, #[case] expected: EmailValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn email_deserialises_with_validation() {
        let ok: Email = serde_json::from_str("\"ada@example.com\"").expect("valid email");
        assert_eq!(ok.as_ref(), "ada@example.com");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }

    #[rstest]
    fn new_user_defaults_to_student() {
        let user = NewUser {
            email: Email::new("ada@example.com").expect("valid"),
            name: Some("Ada".to_owned()),
            photo_url: None,
        }
        .into_user(Utc::now());
        assert_eq!(user.role, Role::Student);
    }

    #[rstest]
    #[case(Role::Student)]
    #[case(Role::Moderator)]
    #[case(Role::Admin)]
    fn role_parses_its_own_spelling(#[case] role: Role) {
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }
}
