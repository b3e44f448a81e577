//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain constructors report what was wrong; these helpers turn that into
//! `400` errors with a `{field, code}` details object so clients can point at
//! the offending input.

use serde_json::json;

use crate::domain::{
    AuthValidationError, Error, IdValidationError, ResourceValidationError, UserValidationError,
};

/// Message returned for any path identifier that is not a UUID.
pub(crate) const INVALID_ID: &str = "Invalid Id";

/// Validation error codes carried in the details object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    EmptyField,
    InvalidEmail,
    InvalidUuid,
    InvalidRating,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            ValidationCode::MissingField => "missing_field",
            ValidationCode::EmptyField => "empty_field",
            ValidationCode::InvalidEmail => "invalid_email",
            ValidationCode::InvalidUuid => "invalid_uuid",
            ValidationCode::InvalidRating => "invalid_rating",
        }
    }
}

fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Parse a path segment into a typed identifier.
///
/// Runs before any store access, so malformed ids never reach a repository.
pub(crate) fn parse_path_id<T>(raw: &str, field: &'static str) -> Result<T, Error>
where
    T: TryFrom<String, Error = IdValidationError>,
{
    T::try_from(raw.to_owned()).map_err(|_| {
        Error::invalid_id(INVALID_ID).with_details(json!({
            "field": field,
            "value": raw,
            "code": ValidationCode::InvalidUuid.as_str(),
        }))
    })
}

pub(crate) fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let message = err.to_string();
    match err {
        AuthValidationError::Missing { field } => {
            field_error(field, ValidationCode::MissingField, message)
        }
        AuthValidationError::EmptyPassword => {
            field_error("password", ValidationCode::EmptyField, message)
        }
        AuthValidationError::User(UserValidationError::EmptyName) => {
            field_error("name", ValidationCode::EmptyField, message)
        }
        AuthValidationError::User(UserValidationError::EmptyEmail) => {
            field_error("email", ValidationCode::EmptyField, message)
        }
        AuthValidationError::User(UserValidationError::MalformedEmail) => {
            field_error("email", ValidationCode::InvalidEmail, message)
        }
    }
}

pub(crate) fn map_resource_validation_error(err: ResourceValidationError) -> Error {
    let message = err.to_string();
    match err {
        ResourceValidationError::Missing { field } => {
            field_error(field, ValidationCode::MissingField, message)
        }
        ResourceValidationError::Blank { field } => {
            field_error(field, ValidationCode::EmptyField, message)
        }
        ResourceValidationError::InvalidReference { field } => {
            field_error(field, ValidationCode::InvalidUuid, message)
        }
        ResourceValidationError::InvalidRating => {
            field_error("rating", ValidationCode::InvalidRating, message)
        }
    }
}
