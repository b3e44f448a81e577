//! Authentication inputs: login credentials, registrations and account
//! patches.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service.

use zeroize::Zeroizing;

use super::{Email, UserName, UserValidationError};

/// Domain error returned when account payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    /// A required field was absent.
    #[error("{field} is required")]
    Missing { field: &'static str },
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Name or email failed validation.
    #[error(transparent)]
    User(#[from] UserValidationError),
}

/// Plaintext password held in zeroizing storage.
///
/// Whitespace is preserved to avoid surprising credential comparisons.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a non-empty password.
    pub fn new(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext, for hashing and verification only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(..)")
    }
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, AuthValidationError> {
    value.ok_or(AuthValidationError::Missing { field })
}

/// Validated login credentials.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(Some(" a@x.com "), Some("pw")).unwrap();
/// assert_eq!(creds.email().as_ref(), "a@x.com");
/// assert_eq!(creds.password().expose(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        let email = Email::new(required(email, "email")?)?;
        let password = Password::new(required(password, "password")?)?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: UserName,
    pub email: Email,
    pub password: Password,
}

impl Registration {
    /// Construct a registration from raw inputs. All three fields are required.
    pub fn try_from_parts(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        Ok(Self {
            name: UserName::new(required(name, "name")?)?,
            email: Email::new(required(email, "email")?)?,
            password: Password::new(required(password, "password")?)?,
        })
    }
}

/// Sparse self-service account update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub name: Option<UserName>,
    pub email: Option<Email>,
    pub password: Option<Password>,
}

impl AccountPatch {
    /// Construct a patch, validating whichever fields are present.
    pub fn try_from_parts(
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        Ok(Self {
            name: name.map(UserName::new).transpose()?,
            email: email.map(Email::new).transpose()?,
            password: password.map(Password::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some("pw"), AuthValidationError::Missing { field: "email" })]
    #[case(Some("a@x.com"), None, AuthValidationError::Missing { field: "password" })]
    #[case(Some("a@x.com"), Some(""), AuthValidationError::EmptyPassword)]
    #[case(Some("  "), Some("pw"), AuthValidationError::User(UserValidationError::EmptyEmail))]
    fn invalid_credentials(
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
        #[case] expected: AuthValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts(Some("a@x.com"), Some(" pw "))
            .expect("valid inputs should succeed");
        assert_eq!(creds.password().expose(), " pw ");
    }

    #[rstest]
    fn registration_requires_a_name() {
        let err = Registration::try_from_parts(None, Some("a@x.com"), Some("pw"))
            .expect_err("name is required");
        assert_eq!(err.to_string(), "name is required");
    }

    #[rstest]
    fn account_patch_validates_present_fields_only() {
        let patch = AccountPatch::try_from_parts(Some("Ada"), None, None).expect("valid patch");
        assert_eq!(patch.name.as_ref().map(AsRef::as_ref), Some("Ada"));
        assert!(patch.email.is_none() && patch.password.is_none());

        let err = AccountPatch::try_from_parts(None, Some("nope"), None)
            .expect_err("malformed email");
        assert_eq!(err, AuthValidationError::User(UserValidationError::MalformedEmail));
    }

    #[rstest]
    fn password_debug_is_redacted() {
        let password = Password::new("hunter2").expect("password");
        assert_eq!(format!("{password:?}"), "Password(..)");
    }
}
