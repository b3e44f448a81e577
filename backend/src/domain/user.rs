//! User data model.
//!
//! [`User`] is the public projection returned to clients. [`StoredUser`]
//! pairs it with the password digest and never leaves the domain/persistence
//! boundary.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Validation errors for user attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked a local part, an `@` or a domain.
    #[error("email must look like name@domain")]
    MalformedEmail,
}

/// Name shown alongside a user's reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Trim and validate a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login email.
///
/// Surrounding whitespace is trimmed; case is preserved and compared
/// verbatim, so `A@x.com` and `a@x.com` are distinct accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Trim and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::MalformedEmail),
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
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One-way password digest in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest produced by a password hasher or read from storage.
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Encoded digest.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub email: Email,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User record as persisted, including the password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// Insert payload for a new user. The digest is already computed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: UserName,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

/// Sparse change set applied to a user record.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<UserName>,
    pub email: Option<Email>,
    pub password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("plainaddress", UserValidationError::MalformedEmail)]
    #[case("@x.com", UserValidationError::MalformedEmail)]
    #[case("a@", UserValidationError::MalformedEmail)]
    fn rejects_bad_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn email_keeps_case_and_trims() {
        let email = Email::new("  Ada@X.com ").expect("valid email");
        assert_eq!(email.as_ref(), "Ada@X.com");
        assert_ne!(email, Email::new("ada@x.com").expect("valid email"));
    }

    #[rstest]
    fn blank_names_are_rejected() {
        assert_eq!(UserName::new(" \t"), Err(UserValidationError::EmptyName));
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[rstest]
    fn user_serializes_without_digest() {
        let now = Utc::now();
        let user = User {
            id: UserId::random(),
            name: UserName::new("Ada").expect("name"),
            email: Email::new("a@x.com").expect("email"),
            verified: false,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&user).expect("serialize");
        assert_eq!(value["email"], "a@x.com");
        assert_eq!(value["verified"], false);
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("createdAt").is_some());
    }
}
