//! Institution records and their validated create/update inputs.

use serde::{Deserialize, Serialize};

use super::{InstitutionId, UserId};

/// Validation failures shared by institution and review inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceValidationError {
    /// A required field was absent.
    #[error("{field} is required")]
    Missing { field: &'static str },
    /// A text field was blank once trimmed.
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    /// A reference field was not a valid identifier.
    #[error("{field} must be a valid id")]
    InvalidReference { field: &'static str },
    /// Rating was not an integer between 1 and 5.
    #[error("rating must be an integer between 1 and 5")]
    InvalidRating,
}

pub(crate) fn required_text(
    value: Option<&str>,
    field: &'static str,
) -> Result<String, ResourceValidationError> {
    let value = value.ok_or(ResourceValidationError::Missing { field })?;
    non_blank(value, field)
}

pub(crate) fn optional_text(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<String>, ResourceValidationError> {
    value.map(|raw| non_blank(raw, field)).transpose()
}

fn non_blank(value: &str, field: &'static str) -> Result<String, ResourceValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ResourceValidationError::Blank { field });
    }
    Ok(trimmed.to_owned())
}

fn optional_owner(value: Option<&str>) -> Result<Option<UserId>, ResourceValidationError> {
    value
        .map(|raw| {
            UserId::new(raw.trim())
                .map_err(|_| ResourceValidationError::InvalidReference { field: "owner" })
        })
        .transpose()
}

/// A reviewable institution.
///
/// `added_by` is the enforcement field for updates and deletes. `owner`
/// records a real-world owner and grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: InstitutionId,
    pub name: String,
    pub location: String,
    pub description: String,
    pub owner: Option<UserId>,
    pub added_by: UserId,
    pub images: Vec<String>,
}

/// Validated create input. The creator comes from the verified identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstitution {
    pub name: String,
    pub location: String,
    pub description: String,
    pub owner: Option<UserId>,
}

impl NewInstitution {
    pub fn try_from_parts(
        name: Option<&str>,
        location: Option<&str>,
        description: Option<&str>,
        owner: Option<&str>,
    ) -> Result<Self, ResourceValidationError> {
        Ok(Self {
            name: required_text(name, "name")?,
            location: required_text(location, "location")?,
            description: required_text(description, "description")?,
            owner: optional_owner(owner)?,
        })
    }
}

/// Sparse institution update. Absent fields are left unchanged; images are
/// appended separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstitutionPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub owner: Option<UserId>,
}

impl InstitutionPatch {
    pub fn try_from_parts(
        name: Option<&str>,
        location: Option<&str>,
        description: Option<&str>,
        owner: Option<&str>,
    ) -> Result<Self, ResourceValidationError> {
        Ok(Self {
            name: optional_text(name, "name")?,
            location: optional_text(location, "location")?,
            description: optional_text(description, "description")?,
            owner: optional_owner(owner)?,
        })
    }

    /// Apply the patch and append `images` to `institution`.
    pub fn apply(&self, institution: &mut Institution, images: &[String]) {
        if let Some(name) = &self.name {
            institution.name.clone_from(name);
        }
        if let Some(location) = &self.location {
            institution.location.clone_from(location);
        }
        if let Some(description) = &self.description {
            institution.description.clone_from(description);
        }
        if let Some(owner) = self.owner {
            institution.owner = Some(owner);
        }
        institution.images.extend_from_slice(images);
    }
}
