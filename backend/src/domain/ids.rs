//! Opaque record identifiers.
//!
//! Every persisted record is keyed by a UUID. Path segments are parsed into
//! these newtypes before any store access, which is where `InvalidId`
//! failures originate.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raised when a raw identifier is not a well-formed UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a valid UUID")]
pub struct IdValidationError;

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier, rejecting padded or malformed input.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = raw.as_ref();
                if raw.is_empty() || raw.trim() != raw {
                    return Err(IdValidationError);
                }
                Uuid::parse_str(raw).map(Self).map_err(|_| IdValidationError)
            }

            /// Mint a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap a UUID read back from storage.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_uuid_id! {
    /// Stable identifier of a registered user.
    UserId
}

define_uuid_id! {
    /// Identifier of an institution record.
    InstitutionId
}

define_uuid_id! {
    /// Identifier of a review record.
    ReviewId
}
